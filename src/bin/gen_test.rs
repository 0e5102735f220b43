//! Messy archive generator for stress testing listpack.
//!
//! Writes raw records as JSON Lines, with the date styles, address
//! obfuscation and reply links real list archives produce, plus a share of
//! garbage.
//!
//! Usage: cargo run --features gen-test --bin gen_test -- [records] [output] [source]
//! Example: cargo run --features gen-test --bin gen_test -- 100000 lkml.jsonl hypermail

use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::Rng;
use rand::seq::SliceRandom;

use listpack::record::RawRecord;

const SENDERS: &[(&str, &str)] = &[
    ("Linus Torvalds", "torvalds@transmeta.com"),
    ("Alan Cox", "alan@lxorguk.ukuu.org.uk"),
    ("Junio C Hamano", "junkio@cox.net"),
    ("Michael Sperberg-McQueen", "U35395@UICVM.BITNET"),
    ("Lou Burnard", "lou@vax.oxford.ac.uk"),
    ("Иван Петров", "ivan@example.ru"),
    ("村上 春樹", "murakami@example.jp"),
    ("\"Doe, Jane\"", "jane.doe@example.com"),
    ("", ""),
];

const SUBJECTS: &[&str] = &[
    "[PATCH] fix oops in scheduler",
    "Re: [PATCH] fix oops in scheduler",
    "electronic copies of the TEI guidelines",
    "Re: Re: Re: free kernel?",
    "Subject with, commas; and \"quotes\"",
    "",
];

const ZONES: &[&str] = &["CDT", "EST", "EDT", "PST", "GMT", "UT", "MEZ", "+0100", "-0700"];

fn main() {
    let args: Vec<String> = env::args().collect();

    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let output = args.get(2).map(|s| s.as_str()).unwrap_or("archive.jsonl");
    let source = args.get(3).map(|s| s.as_str()).unwrap_or("hypermail");

    println!("🧪 Archive Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Records: {}", count);
    println!("   Output:  {}", output);
    println!("   Source:  {}", source);
    println!();

    if source != "hypermail" && source != "marc" {
        eprintln!("Unknown source: {}. Use 'hypermail' or 'marc'", source);
        std::process::exit(1);
    }

    let file = File::create(output).expect("Failed to create output file");
    let mut writer = BufWriter::with_capacity(1024 * 1024, file);
    let mut rng = rand::thread_rng();

    let start = std::time::Instant::now();
    let mut bytes_written: usize = 0;
    let mut received = NaiveDate::from_ymd_opt(1990, 8, 1)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .expect("valid start date");

    for i in 0..count {
        // Mostly forward in time, sometimes several messages on one second.
        if rng.gen_bool(0.95) {
            received += Duration::seconds(rng.gen_range(1..36_000));
        }
        let record = generate_record(&mut rng, i, source, received);
        let line = serde_json::to_string(&record).expect("record serializes");

        bytes_written += line.len() + 1;
        writeln!(writer, "{}", line).unwrap();

        if (i + 1) % 10000 == 0 {
            let elapsed = start.elapsed().as_secs_f64();
            eprint!(
                "\r   Generated {}/{} ({:.1} MB, {:.0} rec/s)",
                i + 1,
                count,
                bytes_written as f64 / 1_000_000.0,
                (i + 1) as f64 / elapsed
            );
        }
    }

    writer.flush().unwrap();

    let elapsed = start.elapsed();
    println!("\n\n✅ Done!");
    println!("   Size: {:.2} MB", bytes_written as f64 / 1_000_000.0);
    println!("   Time: {:.2}s", elapsed.as_secs_f64());
    println!(
        "   Speed: {:.0} rec/s",
        count as f64 / elapsed.as_secs_f64()
    );
}

fn generate_record(
    rng: &mut impl Rng,
    index: usize,
    source: &str,
    received: NaiveDateTime,
) -> RawRecord {
    let (name, email) = *SENDERS.choose(rng).unwrap();
    let subject = *SUBJECTS.choose(rng).unwrap();
    let sent = received - Duration::seconds(rng.gen_range(0..600));

    let (url, email, replyto) = if source == "marc" {
        let list = ["git", "linux-kernel", "git-commits"].choose(rng).unwrap();
        let url = format!("http://marc.info/?l={}&m={}&w=2", list, 100_000 + index);
        let replyto = if rng.gen_bool(0.4) {
            format!("?l={}&m={}&w=2", list, 100_000 + rng.gen_range(0..=index))
        } else {
            String::new()
        };
        (url, obfuscate(email), replyto)
    } else {
        let url = format!(
            "http://lkml.iu.edu/hypermail/linux/kernel/{}/{:04}.html",
            received.format("%y%m"),
            index % 10_000
        );
        let replyto = if rng.gen_bool(0.4) {
            format!("{:04}.html", rng.gen_range(0..10_000))
        } else {
            String::new()
        };
        (url, email.to_string(), replyto)
    };

    RawRecord::new(url)
        .with_source_id(source)
        .with_sender_name(name)
        .with_sender_email(email)
        .with_time_received(messy_date(rng, received))
        .with_time_sent(messy_date(rng, sent))
        .with_replyto(replyto)
        .with_subject(subject)
        .with_body(generate_body(rng, index))
}

fn obfuscate(email: &str) -> String {
    email.replace('@', " () ").replace('.', " ! ")
}

/// Renders `dt` in one of the styles found in archive headers.
fn messy_date(rng: &mut impl Rng, dt: NaiveDateTime) -> String {
    let zone = *ZONES.choose(rng).unwrap();
    match rng.gen_range(0..10) {
        0..=3 => format!("{} {}", dt.format("%a, %-d %b %y %H:%M:%S"), zone),
        4 => format!("{} {}", dt.format("%a, %d %b %Y %H:%M:%S"), zone),
        5 => dt.format("%a %b %e %H:%M:%S %Y").to_string(),
        6 => format!("{}{}", dt.format("%Y-%m-%d %H:%M:%S"), "-0500"),
        7 => format!("{} (GMT)", dt.format("%d %b %Y %H:%M:%S")),
        8 => String::new(),
        _ => "sometime last week".to_string(),
    }
}

fn generate_body(rng: &mut impl Rng, index: usize) -> String {
    match index % 8 {
        0..=3 => format!("Message body #{}\n\n-- \nsignature", index),
        4 => "Line with <angle brackets> & ampersands".to_string(),
        5 => format!("> quoted text\n> more quoted\n\nreply #{}", index),
        6 => {
            let words: Vec<&str> = (0..rng.gen_range(100..2000))
                .map(|_| *["lorem", "ipsum", "kernel", "patch", "ack"].choose(rng).unwrap())
                .collect();
            words.join(" ")
        }
        _ => String::new(),
    }
}
