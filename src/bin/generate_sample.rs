use std::path::PathBuf;

use anyhow::Context;

use employee_dashboard::data::model::Employee;

const ROWS: usize = 200;

const DEPARTMENTS: [(&str, f64); 5] = [
    ("Engineering", 78_000.0),
    ("Sales", 58_000.0),
    ("Marketing", 62_000.0),
    ("Finance", 71_000.0),
    ("HR", 52_000.0),
];

const POSITIONS: [&str; 4] = ["Junior", "Mid", "Senior", "Lead"];

const FIRST_NAMES: [&str; 12] = [
    "Ana", "Luis", "Marta", "Javier", "Lucia", "Carlos", "Elena", "Pablo", "Sofia", "Diego",
    "Irene", "Hugo",
];

const LAST_NAMES: [&str; 8] = [
    "Garcia", "Lopez", "Martinez", "Sanchez", "Perez", "Gomez", "Diaz", "Romero",
];

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// A plausible, valid employee.
fn employee(rng: &mut SimpleRng, index: usize) -> Employee {
    let (department, base_salary) = *rng.pick(&DEPARTMENTS);
    let position_level = rng.below(POSITIONS.len());
    let age = rng.gauss(40.0, 9.0).round().clamp(20.0, 63.0) as i64;
    let years = round_to(rng.next_f64() * (age as f64 - 18.0).min(25.0), 1);
    let salary = base_salary * (1.0 + 0.15 * position_level as f64) + rng.gauss(0.0, 6_000.0);
    let performance = rng.gauss(78.0 + years * 0.4, 8.0).clamp(40.0, 100.0);

    Employee {
        employee_id: Some(format!("E{:04}", index + 1)),
        name: Some(format!("{} {}", rng.pick(&FIRST_NAMES), rng.pick(&LAST_NAMES))),
        age: Some(age),
        department: Some(department.to_string()),
        salary: Some(round_to(salary.max(25_000.0), 0)),
        performance_score: Some(round_to(performance, 1)),
        years_at_company: Some(years),
        gender: Some(if rng.chance(0.5) { "M" } else { "F" }.to_string()),
        position: Some(POSITIONS[position_level].to_string()),
    }
}

/// Damage a row the way hand-entered HR sheets tend to be damaged.
fn dirty(rng: &mut SimpleRng, mut e: Employee) -> Employee {
    match rng.below(6) {
        // Out-of-range age.
        0 => e.age = Some(*rng.pick(&[16, 17, 71, 88])),
        // Non-positive salary.
        1 => e.salary = Some(*rng.pick(&[0.0, -1_500.0])),
        // Messy gender spelling or an unknown value.
        2 => {
            let spelling = *rng.pick(&[" m", "f ", "Male", "female", "X", "unknown"]);
            e.gender = Some(spelling.to_string());
        }
        // Blank cells.
        3 => match rng.below(3) {
            0 => e.performance_score = None,
            1 => e.years_at_company = None,
            _ => e.position = None,
        },
        // Salary outlier.
        4 => e.salary = Some(round_to(rng.gauss(260_000.0, 30_000.0), 0)),
        // Missing id.
        _ => e.employee_id = None,
    }
    e
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let output = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("employees.csv"));

    let mut rows: Vec<Employee> = Vec::with_capacity(ROWS + ROWS / 10);
    for i in 0..ROWS {
        let e = employee(&mut rng, i);
        let e = if rng.chance(0.12) { dirty(&mut rng, e) } else { e };
        rows.push(e);
    }

    // Duplicate ids: copies of earlier rows, some with edited fields.
    for _ in 0..ROWS / 20 {
        let mut copy = rows[rng.below(ROWS)].clone();
        if rng.chance(0.5) {
            copy.salary = copy.salary.map(|s| s + 1_000.0);
        }
        rows.push(copy);
    }

    let mut writer = csv::Writer::from_path(&output)
        .with_context(|| format!("creating {}", output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    log::info!("Wrote {} rows to {}", rows.len(), output.display());
    println!("Wrote {} rows to {}", rows.len(), output.display());
    Ok(())
}
