//! End-to-end tests over the public API: in-memory uploads through the
//! full load → classify → normalize → aggregate pipeline.

use examsheet::analysis::{class_averages, exam_order};
use examsheet::{Config, FileOutcome, Session, SkipReason, SourceFile, run_batch};

fn csv(name: &str, body: &str) -> SourceFile {
    SourceFile::new(name, body.as_bytes().to_vec())
}

/// Config tracking the sub-skill columns used throughout these fixtures.
fn skills_config() -> Config {
    Config {
        subject_keywords: vec![
            "听力".to_string(),
            "阅读".to_string(),
            "写作".to_string(),
            "填空".to_string(),
            "排名".to_string(),
        ],
        ..Config::default()
    }
}

#[test]
fn two_files_union_their_subject_columns() {
    let files = vec![
        csv("midterm.csv", "姓名,总分,阅读\nAlice,90,40\nBob,85,38\n"),
        csv("final.csv", "姓名,总分,听力\nAlice,95,45\nBob,88,42\n"),
    ];
    let output = run_batch(&files, &skills_config());

    let dataset = output.dataset.expect("both files yield records");
    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.subjects, vec!["阅读", "听力"]);

    let alice_midterm = dataset
        .records
        .iter()
        .find(|r| r.student == "Alice" && r.exam == "midterm")
        .unwrap();
    assert_eq!(alice_midterm.total, Some(90.0));
    assert_eq!(alice_midterm.score("阅读"), Some(40.0));
    assert_eq!(alice_midterm.score("听力"), None);

    let alice_final = dataset
        .records
        .iter()
        .find(|r| r.student == "Alice" && r.exam == "final")
        .unwrap();
    assert_eq!(alice_final.score("阅读"), None);
    assert_eq!(alice_final.score("听力"), Some(45.0));

    // Record order is file order, then row order within the file.
    let pairs: Vec<(&str, &str)> = dataset
        .records
        .iter()
        .map(|r| (r.student.as_str(), r.exam.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Alice", "midterm"),
            ("Bob", "midterm"),
            ("Alice", "final"),
            ("Bob", "final"),
        ]
    );
}

#[test]
fn header_below_title_rows_is_located_and_noise_never_becomes_data() {
    let body = "\
第三次月考成绩,,
统计日期:2024-01-20,,
,,
姓名,总分,写作
Alice,92,19
Bob,87,16
";
    let output = run_batch(&[csv("第三次月考.csv", body)], &Config::default());
    let dataset = output.dataset.expect("records");

    assert_eq!(dataset.len(), 2);
    assert!(dataset.records.iter().all(|r| r.exam == "第三次月考"));
    assert!(
        dataset
            .records
            .iter()
            .all(|r| !r.student.contains("统计日期") && !r.student.contains("月考成绩"))
    );
    // The bare writing label is disambiguated in the unified dataset.
    assert_eq!(dataset.subjects, vec!["写作1"]);
    assert_eq!(dataset.records[0].score("写作1"), Some(19.0));
}

#[test]
fn writing_alias_prevents_collision_with_numbered_writing_columns() {
    let files = vec![
        csv("期中.csv", "姓名,总分,写作\nAlice,90,18\n"),
        csv("期末.csv", "姓名,总分,写作2\nAlice,93,20\n"),
    ];
    let output = run_batch(&files, &Config::default());
    let dataset = output.dataset.unwrap();
    assert_eq!(dataset.subjects, vec!["写作1", "写作2"]);
}

#[test]
fn empty_batch_is_the_distinguished_no_data_state() {
    let output = run_batch(&[], &Config::default());
    assert!(output.is_empty());
    assert!(output.dataset.is_none());
    assert!(output.reports.is_empty());
}

#[test]
fn one_bad_file_never_aborts_the_batch() {
    let files = vec![
        csv("good.csv", "姓名,总分\nAlice,90\n"),
        SourceFile::new("broken.csv", vec![0x61, 0x2c, 0xff, 0xfe, 0x0a]),
        csv("noheader.csv", "a,b\n1,2\n"),
        csv("nototal.csv", "姓名,备注\nAlice,ok\n"),
        SourceFile::new("notes.pdf", b"%PDF-1.4".to_vec()),
    ];
    let output = run_batch(&files, &Config::default());

    let dataset = output.dataset.expect("the good file still yields records");
    assert_eq!(dataset.len(), 1);

    assert_eq!(output.reports.len(), 5);
    assert_eq!(output.reports[0].outcome, FileOutcome::Loaded { rows: 1 });
    assert!(matches!(
        output.reports[1].outcome,
        FileOutcome::Skipped(SkipReason::Parse(_))
    ));
    assert_eq!(
        output.reports[2].outcome,
        FileOutcome::Skipped(SkipReason::HeaderNotFound)
    );
    assert_eq!(
        output.reports[3].outcome,
        FileOutcome::Skipped(SkipReason::MissingColumns)
    );
    assert!(matches!(
        &output.reports[4].outcome,
        FileOutcome::Skipped(SkipReason::Parse(cause)) if cause.contains(".pdf")
    ));
}

#[test]
fn all_files_failing_yields_no_data_with_reasons() {
    let files = vec![
        csv("noheader.csv", "a,b\n1,2\n"),
        csv("nototal.csv", "姓名,备注\nAlice,ok\n"),
    ];
    let output = run_batch(&files, &Config::default());
    assert!(output.is_empty());
    assert!(
        output
            .reports
            .iter()
            .all(|r| matches!(r.outcome, FileOutcome::Skipped(_)))
    );
}

#[test]
fn fallback_total_propagates_missing_components() {
    let body = "姓名,客观,主观\nAlice,80,\nBob,70,25\n";
    let output = run_batch(&[csv("模考.csv", body)], &Config::score_only());
    let dataset = output.dataset.unwrap();

    let alice = dataset.records.iter().find(|r| r.student == "Alice").unwrap();
    assert_eq!(alice.total, None);
    let bob = dataset.records.iter().find(|r| r.student == "Bob").unwrap();
    assert_eq!(bob.total, Some(95.0));
}

#[test]
fn score_only_preset_excludes_rank_columns() {
    let body = "姓名,总分,写作,班级排名\nAlice,90,18,3\n";
    let tracked = run_batch(&[csv("期中.csv", body)], &Config::rank_tracking());
    assert_eq!(
        tracked.dataset.unwrap().subjects,
        vec!["写作1", "班级排名"]
    );

    let score_only = run_batch(&[csv("期中.csv", body)], &Config::score_only());
    assert_eq!(score_only.dataset.unwrap().subjects, vec!["写作1"]);
}

#[test]
fn blank_cells_become_missing_not_zero() {
    let body = "姓名,总分,填空\nAlice,,12\nBob,85,\n";
    let output = run_batch(&[csv("期中.csv", body)], &Config::default());
    let dataset = output.dataset.unwrap();

    let alice = dataset.records.iter().find(|r| r.student == "Alice").unwrap();
    assert_eq!(alice.total, None);
    assert_eq!(alice.score("填空"), Some(12.0));

    let bob = dataset.records.iter().find(|r| r.student == "Bob").unwrap();
    assert_eq!(bob.total, Some(85.0));
    assert_eq!(bob.score("填空"), None);
}

#[test]
fn configured_exam_ordering_drives_the_class_view() {
    let config = Config {
        exam_ordering: Some(vec!["期末".to_string(), "期中".to_string()]),
        ..skills_config()
    };
    let files = vec![
        csv("期中.csv", "姓名,总分,听力\nAlice,90,40\nBob,80,36\n"),
        csv("期末.csv", "姓名,总分,听力\nAlice,96,44\nBob,84,38\n"),
    ];
    let output = run_batch(&files, &config);
    let dataset = output.dataset.unwrap();

    let order = exam_order(&dataset, config.exam_ordering.as_deref());
    assert_eq!(order, vec!["期末", "期中"]);

    let averages = class_averages(&dataset, &order);
    assert_eq!(averages[0].exam, "期末");
    assert_eq!(averages[0].total, Some(90.0));
    assert_eq!(averages[0].subjects["听力"], Some(41.0));
    assert_eq!(averages[1].exam, "期中");
    assert_eq!(averages[1].total, Some(85.0));
}

#[test]
fn session_reprocesses_only_when_the_batch_changes() {
    let mut session = Session::new();
    let config = Config::default();
    let files = vec![csv("期中.csv", "姓名,总分\nAlice,90\n")];

    let first = session.process(&files, &config).clone();
    assert_eq!(*session.process(&files, &config), first);

    let more = vec![
        csv("期中.csv", "姓名,总分\nAlice,90\n"),
        csv("期末.csv", "姓名,总分\nAlice,94\n"),
    ];
    let second = session.process(&more, &config);
    assert_eq!(second.dataset.as_ref().unwrap().len(), 2);
}
