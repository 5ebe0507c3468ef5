//! Sample import file offered to operators as a template.

use crate::error::StandardsError;
use crate::target::claim_target_fields;

/// Suggested file name of the sample import file.
pub const SAMPLE_FILENAME: &str = "claims_import_sample.csv";

// Values follow `claim_target_fields` order.
const SAMPLE_ROWS: [[&str; 17]; 3] = [
    [
        "CLM001",
        "PAT12345",
        "John Smith",
        "Pending Review",
        "2025-08-01",
        "1250.00",
        "Z51.11",
        "C78.00",
        "",
        "High Priority",
        "Oncology",
        "Dr. Johnson",
        "City Medical Center",
        "Medicare",
        "65",
        "Male",
        "Oncology",
    ],
    [
        "CLM002",
        "PAT67890",
        "Sarah Johnson",
        "Approved",
        "2025-08-02",
        "850.75",
        "M79.3",
        "M25.511",
        "Z87.891",
        "Standard",
        "Orthopedic",
        "Dr. Smith",
        "Wellness Clinic",
        "Private",
        "42",
        "Female",
        "Orthopedic",
    ],
    [
        "CLM003",
        "PAT11111",
        "Michael Brown",
        "Denied",
        "2025-08-03",
        "2100.50",
        "I25.10",
        "E11.9",
        "Z95.1",
        "Rush",
        "Cardiology",
        "Dr. Wilson",
        "Heart Institute",
        "Medicaid",
        "58",
        "Male",
        "Cardiology",
    ],
];

/// Render the sample import file.
///
/// Headers are the target field labels, so the file maps onto the schema
/// through label matching without manual mapping.
pub fn sample_import_csv() -> Result<String, StandardsError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let labels: Vec<String> = claim_target_fields()
        .into_iter()
        .map(|field| field.label)
        .collect();
    writer
        .write_record(&labels)
        .map_err(|e| StandardsError::csv(SAMPLE_FILENAME, e))?;
    for row in SAMPLE_ROWS {
        writer
            .write_record(row)
            .map_err(|e| StandardsError::csv(SAMPLE_FILENAME, e))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| StandardsError::csv(SAMPLE_FILENAME, e.error()))?;
    String::from_utf8(bytes).map_err(|e| StandardsError::csv(SAMPLE_FILENAME, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_has_header_and_three_rows() {
        let text = sample_import_csv().expect("sample csv");
        insta::assert_snapshot!(text, @r"
        Claim ID,Patient ID,Patient Name,Status,Submission Date,Total Amount,Primary Diagnosis,Secondary Diagnosis,Tertiary Diagnosis,Priority Level,Specialty,Assigned Doctor,Provider,Insurance Type,Age,Gender,Department
        CLM001,PAT12345,John Smith,Pending Review,2025-08-01,1250.00,Z51.11,C78.00,,High Priority,Oncology,Dr. Johnson,City Medical Center,Medicare,65,Male,Oncology
        CLM002,PAT67890,Sarah Johnson,Approved,2025-08-02,850.75,M79.3,M25.511,Z87.891,Standard,Orthopedic,Dr. Smith,Wellness Clinic,Private,42,Female,Orthopedic
        CLM003,PAT11111,Michael Brown,Denied,2025-08-03,2100.50,I25.10,E11.9,Z95.1,Rush,Cardiology,Dr. Wilson,Heart Institute,Medicaid,58,Male,Cardiology
        ");
    }
}
