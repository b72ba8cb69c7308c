use std::env;

use vsml::{DecodeOptions, Image};

fn main() {
    let env = env_logger::Env::new().filter_or("RUST_LOG", "info");
    env_logger::try_init_from_env(env).unwrap_or_default();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: dump <file.vsml> [--swap] [--merge]");
        return;
    };
    let mut options = DecodeOptions::default();
    for flag in args {
        match flag.as_str() {
            "--swap" => options.swap_pages = true,
            "--merge" => options.merge_bitmaps = true,
            other => log::warn!("unknown flag {other}"),
        }
    }

    let image = match Image::open(&path) {
        Ok(image) => image,
        Err(err) => {
            log::error!("{err}");
            return;
        }
    };
    let session = match image.session(options) {
        Ok(session) => session,
        Err(err) => {
            log::error!("{err}");
            return;
        }
    };

    println!("{}", session.meta());
    println!("pages used: {}", session.page_used());
    println!();
    for label in session.labels() {
        println!("{label}");
    }
    for (page, (_, dump)) in session.pages().iter().zip(session.dumps()) {
        println!();
        if let Some(hint) = &page.extraction_hint {
            println!("# {hint}");
        }
        print!("{dump}");
    }
}
