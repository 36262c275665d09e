use doccheck::models::CheckOutcome;
use doccheck::{AnalyticsLog, DocumentChecker};
use std::sync::Arc;

const SAMPLES: &[(&str, &str)] = &[
    (
        "Income certificate",
        "GOVERNMENT OF MAHARASHTRA
REVENUE DEPARTMENT
INCOME CERTIFICATE
Certificate No: INC/2024/001234
This is to certify that Shri Ramesh Patil, resident of Pune district, has an annual income of Rs. 45,000 (Rupees Forty Five Thousand only).
Issued by Tahsildar, Haveli
Valid until 31/03/2099
Government seal and official signature affixed. Revenue stamp attached.",
    ),
    (
        "Identity card",
        "1234 5678 9012 Male DOB: 01/01/1990 Address: Pune",
    ),
    (
        "Photocopied caste certificate",
        "CASTE CERTIFICATE issued by the District Collector. Certificate No: CC/2023/4411. \
         Category: OBC. Name: Sunita Jadhav. Photocopy of the original, official seal visible.",
    ),
    (
        "Expired domicile certificate",
        "DOMICILE CERTIFICATE. This is to certify that Anil Kumar is a resident of Nagpur, \
         Maharashtra since 2001. Issued by Tahsildar Nagpur. This certificate is valid upto 01/01/2020. \
         Government seal.",
    ),
    ("Blurry scan", "ab 12"),
];

fn main() {
    env_logger::init();

    println!("Document Check Demo");
    println!("-------------------");

    let analytics = Arc::new(AnalyticsLog::new(100));
    let checker = DocumentChecker::new().with_analytics(Arc::clone(&analytics));

    for (label, text) in SAMPLES {
        println!("\n{}:", label);
        match checker.check(text) {
            CheckOutcome::Validated(report) => {
                println!("  Type: {}", report.document_type);
                println!(
                    "  Verdict: {} ({}% confidence, {}% security)",
                    if report.valid { "VALID" } else { "INVALID" },
                    report.confidence_percent,
                    report.security_percent()
                );
                if !report.integrity.red_flags.is_empty() {
                    println!("  Red flags: {}", report.integrity.red_flags.join(", "));
                }
                if let Some(date) = &report.expiry.expiry_date_raw {
                    println!("  Expiry date: {}", date);
                }
                println!("  {}", report.suggestion_text);
            }
            CheckOutcome::Rejected(rejection) => {
                println!("  Not validated: {:?}", rejection.kind);
                println!("  {}", rejection.suggestion_text);
            }
        }
    }

    let summary = analytics.summary();
    println!("\nSUMMARY:");
    println!("  Processed: {}", summary.total);
    println!("  Valid: {}", summary.valid);
    println!("  Success rate: {}%", summary.success_rate);
}
