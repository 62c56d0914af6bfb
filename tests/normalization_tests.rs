/// Unit tests for client record normalization
/// Tests field defaults, name assembly, subscription and product shaping
use serde_json::{json, Value};
use switchtransact_viewer::core::models::{ClientRecord, ClientStatus, PersonDetails};

fn normalize(payload: Value) -> ClientRecord {
    let details = PersonDetails::from_payload(payload)
        .expect("payload should deserialize")
        .expect("record should be present");
    ClientRecord::from(details)
}

#[cfg(test)]
mod record_tests {
    use super::*;

    #[test]
    fn test_full_record() {
        let record = normalize(json!({
            "record": {
                "firstname": "Thandi",
                "lastname": "Nkosi",
                "id_number": "9202204720082",
                "member_number": "DSA-0042",
                "is_active": true,
                "email": "thandi@example.co.za",
                "cell": "0821234567"
            }
        }));

        assert_eq!(record.full_name, "Thandi Nkosi");
        assert_eq!(record.id_number, "9202204720082");
        assert_eq!(record.member_number, "DSA-0042");
        assert_eq!(record.status, ClientStatus::Active);
        assert_eq!(record.email, "thandi@example.co.za");
        assert_eq!(record.contact_cell, "0821234567");
        assert!(record.subscriptions.is_empty());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let record = normalize(json!({"record": {"member_number": "1"}}));

        assert_eq!(record.full_name, "");
        assert_eq!(record.id_number, "");
        assert_eq!(record.status, ClientStatus::Inactive);
        assert_eq!(record.email, "");
        assert_eq!(record.contact_cell, "");
    }

    #[test]
    fn test_single_name_is_trimmed() {
        assert_eq!(
            normalize(json!({"record": {"firstname": "Jane"}})).full_name,
            "Jane"
        );
        assert_eq!(
            normalize(json!({"record": {"lastname": "Doe"}})).full_name,
            "Doe"
        );
    }

    #[test]
    fn test_inactive_flag_variants() {
        for flag in [json!(false), json!(0), json!(0.0), json!(""), json!(null), json!([]), json!({})] {
            let record = normalize(json!({"record": {"firstname": "A", "is_active": flag}}));
            assert_eq!(record.status, ClientStatus::Inactive, "flag {}", flag);
        }
        let record = normalize(json!({"record": {"firstname": "A"}}));
        assert_eq!(record.status, ClientStatus::Inactive);
    }

    #[test]
    fn test_any_non_empty_flag_is_active() {
        // Only emptiness counts: the words themselves are not interpreted
        for flag in [
            json!(true),
            json!(1),
            json!(-2.5),
            json!("true"),
            json!("false"),
            json!("0"),
            json!("no"),
            json!([0]),
            json!({"value": false}),
        ] {
            let record = normalize(json!({"record": {"firstname": "A", "is_active": flag}}));
            assert_eq!(record.status, ClientStatus::Active, "flag {}", flag);
        }
    }

    #[test]
    fn test_serialized_status_labels() {
        let record = normalize(json!({"record": {"firstname": "A", "is_active": true}}));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "Active");
    }
}

#[cfg(test)]
mod subscription_tests {
    use super::*;

    #[test]
    fn test_subscription_defaults() {
        let record = normalize(json!({
            "record": {"firstname": "A"},
            "subscriptions": [
                {},
                {"status": "cancelled", "start_date": "2023-01-01", "end_date": ""},
                {"status": "active", "start_date": "2024-02-01", "end_date": "2025-02-01"}
            ]
        }));

        let subs = &record.subscriptions;
        assert_eq!(subs.len(), 3);

        assert_eq!(subs[0].sub_status, "Unknown");
        assert_eq!(subs[0].sub_start_date, "");
        assert_eq!(subs[0].sub_end_date, "Ongoing");
        assert!(subs[0].products.is_empty());

        assert_eq!(subs[1].sub_status, "cancelled");
        assert_eq!(subs[1].sub_end_date, "Ongoing");

        assert_eq!(subs[2].sub_start_date, "2024-02-01");
        assert_eq!(subs[2].sub_end_date, "2025-02-01");
    }

    #[test]
    fn test_null_end_date_is_ongoing() {
        let record = normalize(json!({
            "record": {"firstname": "A"},
            "subscriptions": [{"end_date": null}]
        }));
        assert_eq!(record.subscriptions[0].sub_end_date, "Ongoing");
    }

    #[test]
    fn test_non_object_subscriptions_are_skipped() {
        let record = normalize(json!({
            "record": {"firstname": "A"},
            "subscriptions": ["bogus", {"status": "active"}, 7]
        }));
        assert_eq!(record.subscriptions.len(), 1);
        assert_eq!(record.subscriptions[0].sub_status, "active");
    }
}

#[cfg(test)]
mod product_tests {
    use super::*;

    #[test]
    fn test_products_keep_order_and_format_amounts() {
        let record = normalize(json!({
            "record": {"firstname": "A"},
            "subscriptions": [{
                "status": "active",
                "products": [
                    {"name": "Funeral Cover", "amount": "149"},
                    {"name": "Legal Assist", "amount": 89.9},
                    {"amount": "12.5"},
                    {"name": "Free Tier"}
                ]
            }]
        }));

        let products = &record.subscriptions[0].products;
        let names: Vec<&str> = products.iter().map(|p| p.product_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Funeral Cover", "Legal Assist", "Unknown Product", "Free Tier"]
        );

        let amounts: Vec<&str> = products
            .iter()
            .map(|p| p.product_amount_formatted.as_str())
            .collect();
        assert_eq!(amounts, vec!["R 149.00", "R 89.90", "R 12.50", "R 0.00"]);
    }

    #[test]
    fn test_products_not_a_list() {
        let record = normalize(json!({
            "record": {"firstname": "A"},
            "subscriptions": [{"products": {"name": "x"}}]
        }));
        assert!(record.subscriptions[0].products.is_empty());
    }
}
