use chrono::Local;
use rand::{Rng, seq::IndexedRandom};

const METHODS: [(&str, u8); 5] = [
    ("GET", 12),
    ("HEAD", 2),
    ("OPTIONS", 1),
    ("POST", 3),
    ("DELETE", 1),
];
const PATHS: [(&str, u8); 6] = [
    ("/", 10),
    ("/index.html", 15),
    ("/api/items", 40),
    ("/static/app.js", 20),
    ("/admin", 5),
    ("/gallery", 10),
];
const STATUS: [(u16, u8); 6] = [
    (200, 60),
    (204, 5),
    (301, 5),
    (304, 15),
    (404, 10),
    (500, 2),
];
const USERS: [(&str, u8); 3] = [("-", 20), ("frank", 2), ("alice", 1)];

pub fn generate_line<R: Rng + ?Sized>(rng: &mut R) -> String {
    let ip = format!(
        "10.0.{}.{}",
        rng.random_range(0..256),
        rng.random_range(0..256)
    );
    let user = USERS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let timestamp = Local::now().format("%d/%b/%Y:%H:%M:%S %z");
    let method = METHODS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let path = PATHS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let status = STATUS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    // HEAD responses log their length as '-'.
    let length = if method == "HEAD" {
        "-".to_string()
    } else {
        rng.random_range(100..50_000).to_string()
    };

    format!("{ip} - {user} [{timestamp}] \"{method} {path} HTTP/1.1\" {status} {length}")
}
