use std::path::Path;

use csv::Writer;

use examsheet::{Config, SourceFile, run_batch};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const STUDENTS: [&str; 12] = [
    "王小明", "李华", "张伟", "刘洋", "陈静", "杨帆",
    "赵磊", "黄蕾", "周涛", "吴珊", "徐强", "孙悦",
];

/// One student's generated sub-scores for a sitting.
struct Sheet {
    objective: f64,
    subjective: f64,
    writing: f64,
    cloze: f64,
}

fn draw_sheet(rng: &mut SimpleRng, skill: f64) -> Sheet {
    let clamp = |v: f64, max: f64| v.clamp(0.0, max);
    Sheet {
        objective: clamp(rng.gauss(55.0 * skill, 6.0), 70.0),
        subjective: clamp(rng.gauss(24.0 * skill, 4.0), 30.0),
        writing: clamp(rng.gauss(18.0 * skill, 2.5), 25.0),
        cloze: clamp(rng.gauss(11.0 * skill, 2.0), 15.0),
    }
}

fn round1(v: f64) -> String {
    format!("{:.1}", v)
}

fn main() {
    env_logger::init();

    let mut rng = SimpleRng::new(42);

    // Per-student ability factor, shared across both sittings so the
    // trend charts have something coherent to show.
    let skills: Vec<f64> = STUDENTS
        .iter()
        .map(|_| rng.gauss(1.0, 0.08).clamp(0.7, 1.2))
        .collect();

    // ---- 第一次月考.csv: clean sheet, header on row 0, bare 写作 label ----
    let path_a = "第一次月考.csv";
    let mut writer = Writer::from_path(path_a).expect("Failed to create output file");
    writer
        .write_record(["姓名", "总分", "客观", "主观", "写作", "填空", "班级排名"])
        .expect("Failed to write header");

    let mut totals: Vec<(usize, f64)> = Vec::new();
    let mut sheets: Vec<Option<Sheet>> = Vec::new();
    for (i, _) in STUDENTS.iter().enumerate() {
        // One absentee so missing-value handling shows up in the output.
        if i == 7 {
            sheets.push(None);
            continue;
        }
        let sheet = draw_sheet(&mut rng, skills[i]);
        totals.push((i, sheet.objective + sheet.subjective + sheet.writing + sheet.cloze));
        sheets.push(Some(sheet));
    }
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    let rank_of = |i: usize, ranked: &[(usize, f64)]| {
        ranked
            .iter()
            .position(|(idx, _)| *idx == i)
            .map(|p| (p + 1).to_string())
            .unwrap_or_default()
    };

    for (i, name) in STUDENTS.iter().enumerate() {
        match &sheets[i] {
            Some(sheet) => {
                let total = sheet.objective + sheet.subjective + sheet.writing + sheet.cloze;
                writer
                    .write_record([
                        name.to_string(),
                        round1(total),
                        round1(sheet.objective),
                        round1(sheet.subjective),
                        round1(sheet.writing),
                        round1(sheet.cloze),
                        rank_of(i, &totals),
                    ])
                    .expect("Failed to write row");
            }
            None => {
                writer
                    .write_record([*name, "缺考", "", "", "", "", ""])
                    .expect("Failed to write row");
            }
        }
    }
    writer.flush().expect("Failed to flush");

    // ---- 期末考试.csv: title noise above the header, numbered 写作2 ----
    let path_b = "期末考试.csv";
    let mut writer = Writer::from_path(path_b).expect("Failed to create output file");
    writer
        .write_record(["高二英语期末考试成绩统计表", "", "", "", "", ""])
        .expect("Failed to write title");
    writer
        .write_record(["", "", "", "", "", ""])
        .expect("Failed to write spacer");
    writer
        .write_record(["姓名", "最新得分", "客观", "主观", "写作2", "填空"])
        .expect("Failed to write header");

    for (i, name) in STUDENTS.iter().enumerate() {
        let sheet = draw_sheet(&mut rng, skills[i]);
        let total = sheet.objective + sheet.subjective + sheet.writing + sheet.cloze;
        writer
            .write_record([
                name.to_string(),
                round1(total),
                round1(sheet.objective),
                round1(sheet.subjective),
                round1(sheet.writing),
                round1(sheet.cloze),
            ])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush");

    println!(
        "Wrote {} students to {path_a} and {path_b}",
        STUDENTS.len()
    );

    // Round-trip the generated sheets through the pipeline as a smoke check.
    let files = vec![
        SourceFile::from_path(Path::new(path_a)).expect("reading sample file"),
        SourceFile::from_path(Path::new(path_b)).expect("reading sample file"),
    ];
    let output = run_batch(&files, &Config::default());
    for report in &output.reports {
        println!("{}: {:?}", report.file_name, report.outcome);
    }
    if let Some(dataset) = &output.dataset {
        println!(
            "Unified dataset: {} records, subjects: {:?}",
            dataset.len(),
            dataset.subjects
        );
    }
}
