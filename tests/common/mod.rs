use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const HEADER: [&str; 9] = [
    "user_id",
    "name",
    "email",
    "phone",
    "college",
    "user_type",
    "participation_type",
    "paid",
    "method",
];

/// Writes `rows` participant registrations; every third one arrives
/// with a partial cash payment.
pub fn generate_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(HEADER)?;

    for i in 1..=rows {
        let paid = if i % 3 == 0 { "50" } else { "" };
        wtr.write_record([
            format!("MH{i:05}").as_str(),
            &format!("Student {i}"),
            &format!("student{i}@example.com"),
            "9000000000",
            "Andhra University",
            "participant",
            "cultural",
            paid,
            if paid.is_empty() { "" } else { "cash" },
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
