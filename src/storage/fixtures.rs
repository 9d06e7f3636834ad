//! Sample bills used to seed the in-memory store and by tests

use crate::core::bill::{BillRecord, BillStatus};

#[allow(clippy::too_many_arguments)]
fn record(
    id: &str,
    expense_type: &str,
    name: &str,
    date: &str,
    amount: f64,
    status: BillStatus,
    file_name: &str,
    commentary: &str,
    comment_admin: &str,
    vat: Option<f64>,
) -> BillRecord {
    BillRecord {
        id: Some(id.to_string()),
        expense_type: expense_type.to_string(),
        name: name.to_string(),
        date: date.to_string(),
        amount,
        status,
        file_url: Some(format!(
            "https://test.storage.tld/v0/b/billable-677b6.appspot.com/o/justificatifs%2F{}?alt=media",
            file_name
        )),
        file_name: Some(file_name.to_string()),
        commentary: Some(commentary.to_string()),
        comment_admin: Some(comment_admin.to_string()),
        email: "a@a".to_string(),
        vat,
        pct: 20,
    }
}

/// Four bills, one per status plus a duplicate pending, in store order
pub fn bills() -> Vec<BillRecord> {
    vec![
        record(
            "47qAXb6fIm2zOKkLzMro",
            "Hôtel et logement",
            "encore",
            "2004-04-04",
            400.0,
            BillStatus::Pending,
            "preview-facture-free-201801-pdf-1.jpg",
            "séminaire billed",
            "ok",
            Some(80.0),
        ),
        record(
            "BeKy5Mo4jkmdfPGYpTxZ",
            "Services en ligne",
            "test1",
            "2001-01-01",
            100.0,
            BillStatus::Refused,
            "1592770761.jpeg",
            "plop",
            "en fait non",
            None,
        ),
        record(
            "UIUZtnPQvnbFnB0ozvJh",
            "Services en ligne",
            "test3",
            "2003-03-03",
            300.0,
            BillStatus::Accepted,
            "facture-client-php-exportee-dans-document-pdf-enregistre-sur-disque-dur.png",
            "",
            "bon bah d'accord",
            Some(60.0),
        ),
        record(
            "qcCK3SzECmaZAGRrHjaC",
            "Restaurants et bars",
            "test2",
            "2002-02-02",
            200.0,
            BillStatus::Refused,
            "preview-facture-free-201801-pdf-1.jpg",
            "test2",
            "pas la bonne facture",
            Some(40.0),
        ),
    ]
}
