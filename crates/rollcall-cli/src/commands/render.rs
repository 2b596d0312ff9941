use rollcall_application::ListSnapshot;
use rollcall_core::patient::Patient;
use std::io::{self, Write};
use std::time::Duration;

/// `identifier  Family, Given Middle  M/F  DOB: yyyy-mm-dd`
pub fn patient_row(patient: &Patient) -> String {
    let gender = if patient.is_male() { "M" } else { "F" };
    let dob = patient
        .birthdate
        .map(|date| date.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "{}  {}  {}  DOB: {}",
        patient.identifier,
        patient.full_name(),
        gender,
        dob
    )
}

pub fn write_snapshot(
    out: &mut impl Write,
    snapshot: &ListSnapshot,
    elapsed: Duration,
) -> io::Result<()> {
    if let Some(notice) = snapshot.notice() {
        writeln!(out, "{notice}")?;
    } else if snapshot.patients.is_empty() {
        writeln!(out, "No patients found")?;
    }

    for patient in &snapshot.patients {
        writeln!(out, "{}", patient_row(patient))?;
    }

    writeln!(
        out,
        "{} patient(s) in {} ms",
        snapshot.patients.len(),
        elapsed.as_millis()
    )
}
