use acta_core::{Activity, ActivityStatus};
use acta_search::{fuzzy::MatchOpts, record_matches, suggestions};
use chrono::NaiveDate;
use std::time::Instant;

const TOPICS: [&str; 8] = ["React", "Rust", "Data", "Robotics", "Cloud", "Design", "Quantum", "Finance"];
const KINDS: [&str; 4] = ["Workshop", "Competition", "Internship", "Seminar"];

fn gen_activity(i: usize) -> Activity {
    let status = match i % 3 {
        0 => ActivityStatus::Pending,
        1 => ActivityStatus::Approved,
        _ => ActivityStatus::Rejected,
    };
    Activity {
        id: format!("act-{i:06}"),
        title: format!("{} {} {}", TOPICS[i % TOPICS.len()], KINDS[i % KINDS.len()], i % 97),
        description: format!("session {} for cohort {}", i % 13, i % 7),
        kind: KINDS[i % KINDS.len()].to_string(),
        status,
        student: format!("student-{:04}", i % 2_000),
        department: format!("dept-{}", i % 12),
        date: NaiveDate::from_ymd_opt(2024, 1 + (i % 12) as u32, 1 + (i % 28) as u32).unwrap_or_default(),
        credits: (i % 5) as f64,
        tags: vec![TOPICS[(i + 3) % TOPICS.len()].to_lowercase()],
        verified: i % 2 == 0,
    }
}

fn percentile_us(xs: &mut [u128], p: f64) -> u128 {
    if xs.is_empty() {
        return 0;
    }
    xs.sort_unstable();
    let idx = ((xs.len() as f64 - 1.0) * p).round() as usize;
    xs[idx]
}

fn main() {
    let n: usize = std::env::var("ACTA_BENCH_DOCS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5_000);
    let rounds: usize = std::env::var("ACTA_BENCH_ROUNDS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(50);

    eprintln!("building corpus: {} activities", n);
    let t0 = Instant::now();
    let corpus: Vec<Activity> = (0..n).map(gen_activity).collect();
    let build_ms = t0.elapsed().as_secs_f64() * 1_000.0;
    let fields: Vec<String> = ["title", "description", "student"].iter().map(|s| s.to_string()).collect();

    let substring_qs: Vec<String> = TOPICS.iter().map(|t| t.to_lowercase()).collect();
    let typo_qs: Vec<String> = vec!["workshp".into(), "robotcs".into(), "competiton".into(), "semnar".into()];

    let run = |label: &str, qs: &[String]| {
        let mut times: Vec<u128> = Vec::with_capacity(qs.len() * rounds);
        let mut hits = 0usize;
        for _ in 0..rounds {
            for q in qs {
                let t = Instant::now();
                hits = corpus.iter().filter(|a| record_matches(*a, &fields, q, MatchOpts::default())).count();
                let _ = suggestions(&corpus, &fields, q, 8);
                times.push(t.elapsed().as_micros());
            }
        }
        let p50 = percentile_us(&mut times.clone(), 0.50) as f64 / 1000.0;
        let p99 = percentile_us(&mut times, 0.99) as f64 / 1000.0;
        println!("{}: p50={:.3}ms p99={:.3}ms ({} queries x {} rounds, last hits={})", label, p50, p99, qs.len(), rounds, hits);
    };

    println!("corpus_build: {:.1}ms docs={}", build_ms, n);
    run("substring", &substring_qs);
    run("typo", &typo_qs);
}
