use std::{
    fs,
    io::{self, Read},
};

use anyhow::anyhow;
use log::{debug, warn};
use packer_unpack::{detect, extract_first_url, unpack};

const USAGE: &str = "usage: unpack [--url] [FILE]";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut url_only = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        if arg == "--url" {
            url_only = true;
        } else if arg == "-h" || arg == "--help" {
            println!("{USAGE}");
            return Ok(());
        } else if path.is_none() {
            path = Some(arg);
        } else {
            return Err(anyhow!("unexpected argument {arg}\n{USAGE}"));
        }
    }

    let source = match &path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    debug!("[unpack] read {} bytes", source.len());

    if url_only {
        println!("{}", extract_first_url(&source)?);
        return Ok(());
    }

    if !detect(&source) {
        return Err(anyhow!("[unpack] no packer script found"));
    }

    let mut found = 0;
    for script in unpack(&source) {
        println!("{script}");
        found += 1;
    }

    if found == 0 {
        warn!("[unpack] packer header found but no block could be unpacked");
        return Err(anyhow!("[unpack] no usable packed block"));
    }

    Ok(())
}
