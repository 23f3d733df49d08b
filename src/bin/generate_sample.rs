use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

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

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const HEADERS: [&str; 6] = ["ID", "NAME", "EMAIL", "PHONE", "CITY", "SCORE"];
const NAMES: [&str; 6] = ["Alice", "Bob", "Chen", "Dara", "Emeka", "Fatima"];
const CITIES: [&str; 4] = ["Lisbon", "Osaka", "Lagos", "Quito"];

/// Per-column probability that a cell is left blank.
const BLANK_RATE: [f64; 6] = [0.05, 0.1, 0.3, 0.4, 0.2, 0.25];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let n_rows: u32 = 200;

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Contacts")?;

    for (col, header) in (0u16..).zip(HEADERS) {
        sheet.write_string_with_format(0, col, header, &bold)?;
    }

    let mut blanks = 0usize;
    for row in 1..=n_rows {
        let i = (row - 1) as usize;
        for (col, rate) in (0u16..).zip(BLANK_RATE) {
            if rng.chance(rate) {
                blanks += 1;
                continue;
            }
            match col {
                0 => sheet.write_number(row, col, row as f64)?,
                1 => sheet.write_string(row, col, NAMES[i % NAMES.len()])?,
                2 => sheet.write_string(
                    row,
                    col,
                    format!("{}{row}@example.com", NAMES[i % NAMES.len()].to_lowercase()),
                )?,
                3 => sheet.write_string(row, col, format!("+1-555-{:04}", rng.next_u64() % 10_000))?,
                4 => sheet.write_string(row, col, CITIES[(rng.next_u64() % 4) as usize])?,
                _ => sheet.write_number(row, col, (rng.next_f64() * 1000.0).round() / 10.0)?,
            };
        }
    }

    let output_path = "sample_data.xlsx";
    workbook
        .save(output_path)
        .with_context(|| format!("writing {output_path}"))?;

    println!(
        "Wrote {n_rows} rows x {} columns ({blanks} blank cells) to {output_path}",
        HEADERS.len()
    );
    Ok(())
}
