use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Minimum number of repetitions a plan can schedule.
pub const MIN_REPETITIONS: u32 = 1;
/// Maximum number of repetitions a plan can schedule (one year of weekly slots).
pub const MAX_REPETITIONS: u32 = 52;

/// A client selected for scheduling, supplied by the parent view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    /// Display name used in summaries and warnings
    pub full_name: String,
    pub name: String,
    pub surname: String,
}

/// A prepaid session package owned by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientPackage {
    pub package_id: String,
    pub package_name: String,
    /// Unused session credits left in this package
    pub remaining_sessions: u32,
}

/// Entry of the client-to-packages map, one per client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientPackages {
    pub client_id: String,
    pub packages: Vec<ClientPackage>,
}

/// How a client pays for scheduled sessions.
///
/// The planner only distinguishes package payment from everything else;
/// upstream sends several non-package method strings and all of them map
/// to `Single`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    /// Session credits are drawn down from a prepaid package
    Package,
    Single,
}

impl PaymentMethod {
    /// Wire name used by the upstream booking service
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Package => "paketten-tahsil",
            PaymentMethod::Single => "single",
        }
    }

    pub fn is_package(&self) -> bool {
        matches!(self, PaymentMethod::Package)
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        match value.as_str() {
            "paketten-tahsil" => PaymentMethod::Package,
            _ => PaymentMethod::Single,
        }
    }
}

impl From<PaymentMethod> for String {
    fn from(value: PaymentMethod) -> Self {
        value.as_str().to_string()
    }
}

/// Per-client payment configuration, supplied by the parent view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSettings {
    pub payment_method: PaymentMethod,
    /// Selected package; only meaningful for package payment
    pub package_id: Option<String>,
    pub order_id: Option<String>,
}

/// Cadence at which the scheduled event repeats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    #[default]
    Weekly,
    Monthly,
}

impl RecurrenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceType::Weekly => "weekly",
            RecurrenceType::Monthly => "monthly",
        }
    }

    /// Human label for selectors and summaries
    pub fn label(&self) -> &'static str {
        match self {
            RecurrenceType::Weekly => "Weekly",
            RecurrenceType::Monthly => "Monthly",
        }
    }

    /// Parse a form value; anything unrecognized falls back to weekly
    pub fn from_form_value(value: &str) -> Self {
        match value {
            "monthly" => RecurrenceType::Monthly,
            _ => RecurrenceType::Weekly,
        }
    }
}

/// One client's slice of a repetition plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRepetition {
    pub customer_id: String,
    pub customer_name: String,
    pub number_of_repetitions: u32,
    pub order_id: Option<String>,
    pub package_id: Option<String>,
}

/// Payload handed to the parent when the user confirms a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepetitionData {
    pub is_recurring: bool,
    pub recurring_type: RecurrenceType,
    pub repetitions: Vec<CustomerRepetition>,
}

/// Coerce raw form input into the allowed repetition range.
///
/// Non-numeric input becomes `MIN_REPETITIONS`; numeric input is clamped
/// into `[MIN_REPETITIONS, MAX_REPETITIONS]`.
pub fn clamp_repetition_count(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(value) => value.clamp(MIN_REPETITIONS, MAX_REPETITIONS),
        Err(_) => MIN_REPETITIONS,
    }
}

/// Rebuild the per-client repetition list from its inputs.
///
/// The output has one entry per selected client, in roster order. Clients
/// without payment settings get no order or package reference.
pub fn build_repetitions(
    clients: &[Client],
    settings: &HashMap<String, PaymentSettings>,
    count: u32,
) -> Vec<CustomerRepetition> {
    clients
        .iter()
        .map(|client| {
            let client_settings = settings.get(&client.id);
            CustomerRepetition {
                customer_id: client.id.clone(),
                customer_name: client.full_name.clone(),
                number_of_repetitions: count,
                order_id: client_settings.and_then(|s| s.order_id.clone()),
                package_id: client_settings.and_then(|s| s.package_id.clone()),
            }
        })
        .collect()
}

/// Package-sufficiency assessment for a single client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PackageCoverage {
    /// Package payment with enough remaining sessions
    Covered {
        package_name: String,
        remaining: u32,
    },
    /// Package payment, but the package cannot cover the requested count
    InsufficientSessions {
        package_name: String,
        remaining: u32,
        needed: u32,
    },
    /// Package payment with no resolvable package selection
    NoPackageSelected,
    /// The client does not pay from a package, or has no settings at all
    NotPackagePayment,
}

impl PackageCoverage {
    pub fn is_sufficient(&self) -> bool {
        matches!(self, PackageCoverage::Covered { .. })
    }

    /// Advisory text for the confirmation prompt; `None` when covered.
    pub fn warning(&self) -> Option<String> {
        match self {
            PackageCoverage::Covered { .. } => None,
            PackageCoverage::InsufficientSessions {
                remaining, needed, ..
            } => Some(format!(
                "insufficient sessions ({} available, {} needed)",
                remaining, needed
            )),
            PackageCoverage::NoPackageSelected => Some("no package selected".to_string()),
            PackageCoverage::NotPackagePayment => {
                Some("not using package payment".to_string())
            }
        }
    }
}

/// Check one client's package against the requested repetition count.
pub fn assess_coverage(
    client: &Client,
    package_map: &[ClientPackages],
    settings: &HashMap<String, PaymentSettings>,
    needed: u32,
) -> PackageCoverage {
    let client_settings = match settings.get(&client.id) {
        Some(s) if s.payment_method.is_package() => s,
        _ => return PackageCoverage::NotPackagePayment,
    };

    let package_id = match &client_settings.package_id {
        Some(id) => id,
        None => return PackageCoverage::NoPackageSelected,
    };

    let package = package_map
        .iter()
        .find(|entry| entry.client_id == client.id)
        .and_then(|entry| {
            entry
                .packages
                .iter()
                .find(|package| &package.package_id == package_id)
        });

    match package {
        Some(package) if package.remaining_sessions >= needed => PackageCoverage::Covered {
            package_name: package.package_name.clone(),
            remaining: package.remaining_sessions,
        },
        Some(package) => PackageCoverage::InsufficientSessions {
            package_name: package.package_name.clone(),
            remaining: package.remaining_sessions,
            needed,
        },
        None => PackageCoverage::NoPackageSelected,
    }
}

/// Collect the advisory warnings for every selected client, in roster order.
///
/// An empty result means the plan can be confirmed without prompting.
pub fn collect_warnings(
    clients: &[Client],
    package_map: &[ClientPackages],
    settings: &HashMap<String, PaymentSettings>,
    needed: u32,
) -> Vec<String> {
    clients
        .iter()
        .filter_map(|client| {
            assess_coverage(client, package_map, settings, needed)
                .warning()
                .map(|warning| format!("{}: {}", client.full_name, warning))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str, name: &str, surname: &str) -> Client {
        Client {
            id: id.to_string(),
            full_name: format!("{} {}", name, surname),
            name: name.to_string(),
            surname: surname.to_string(),
        }
    }

    fn packages_for(client_id: &str, entries: &[(&str, &str, u32)]) -> ClientPackages {
        ClientPackages {
            client_id: client_id.to_string(),
            packages: entries
                .iter()
                .map(|(package_id, package_name, remaining)| ClientPackage {
                    package_id: package_id.to_string(),
                    package_name: package_name.to_string(),
                    remaining_sessions: *remaining,
                })
                .collect(),
        }
    }

    fn package_settings(package_id: &str, order_id: &str) -> PaymentSettings {
        PaymentSettings {
            payment_method: PaymentMethod::Package,
            package_id: Some(package_id.to_string()),
            order_id: Some(order_id.to_string()),
        }
    }

    fn single_settings() -> PaymentSettings {
        PaymentSettings {
            payment_method: PaymentMethod::Single,
            package_id: None,
            order_id: None,
        }
    }

    #[test]
    fn test_clamp_repetition_count_bounds() {
        assert_eq!(clamp_repetition_count("1"), 1);
        assert_eq!(clamp_repetition_count("52"), 52);
        assert_eq!(clamp_repetition_count("7"), 7);

        // Out-of-range input is pulled back inside the bounds
        assert_eq!(clamp_repetition_count("0"), 1);
        assert_eq!(clamp_repetition_count("53"), 52);
        assert_eq!(clamp_repetition_count("500"), 52);
    }

    #[test]
    fn test_clamp_repetition_count_non_numeric() {
        assert_eq!(clamp_repetition_count(""), 1);
        assert_eq!(clamp_repetition_count("abc"), 1);
        assert_eq!(clamp_repetition_count("-3"), 1);
        assert_eq!(clamp_repetition_count("3.5"), 1);
        assert_eq!(clamp_repetition_count(" 7 "), 7);
    }

    #[test]
    fn test_build_repetitions_matches_roster() {
        let clients = vec![
            client("client-1", "Alice", "Johnson"),
            client("client-2", "Bora", "Kaya"),
            client("client-3", "Cem", "Arslan"),
        ];
        let mut settings = HashMap::new();
        settings.insert(
            "client-1".to_string(),
            package_settings("pkg-10", "order-77"),
        );
        settings.insert("client-2".to_string(), single_settings());
        // client-3 has no settings at all

        let repetitions = build_repetitions(&clients, &settings, 4);

        assert_eq!(repetitions.len(), clients.len());
        for (entry, client) in repetitions.iter().zip(&clients) {
            assert_eq!(entry.customer_id, client.id);
            assert_eq!(entry.customer_name, client.full_name);
            assert_eq!(entry.number_of_repetitions, 4);
        }

        assert_eq!(repetitions[0].package_id.as_deref(), Some("pkg-10"));
        assert_eq!(repetitions[0].order_id.as_deref(), Some("order-77"));
        assert_eq!(repetitions[1].package_id, None);
        assert_eq!(repetitions[1].order_id, None);
        assert_eq!(repetitions[2].package_id, None);
        assert_eq!(repetitions[2].order_id, None);
    }

    #[test]
    fn test_build_repetitions_empty_roster() {
        let repetitions = build_repetitions(&[], &HashMap::new(), 3);
        assert!(repetitions.is_empty());
    }

    #[test]
    fn test_assess_coverage_covered() {
        let client = client("client-1", "Alice", "Johnson");
        let packages = vec![packages_for(
            "client-1",
            &[("pkg-10", "10 Session Pilates", 8)],
        )];
        let mut settings = HashMap::new();
        settings.insert(
            "client-1".to_string(),
            package_settings("pkg-10", "order-77"),
        );

        let coverage = assess_coverage(&client, &packages, &settings, 3);
        assert_eq!(
            coverage,
            PackageCoverage::Covered {
                package_name: "10 Session Pilates".to_string(),
                remaining: 8,
            }
        );
        assert!(coverage.is_sufficient());
        assert_eq!(coverage.warning(), None);
    }

    #[test]
    fn test_assess_coverage_insufficient_sessions() {
        let client = client("client-1", "Alice", "Johnson");
        let packages = vec![packages_for(
            "client-1",
            &[("pkg-10", "10 Session Pilates", 2)],
        )];
        let mut settings = HashMap::new();
        settings.insert(
            "client-1".to_string(),
            package_settings("pkg-10", "order-77"),
        );

        let coverage = assess_coverage(&client, &packages, &settings, 3);
        assert_eq!(
            coverage,
            PackageCoverage::InsufficientSessions {
                package_name: "10 Session Pilates".to_string(),
                remaining: 2,
                needed: 3,
            }
        );
        assert!(!coverage.is_sufficient());
        assert_eq!(
            coverage.warning().as_deref(),
            Some("insufficient sessions (2 available, 3 needed)")
        );

        // Proceeding with the warning still schedules the full count
        let repetitions = build_repetitions(std::slice::from_ref(&client), &settings, 3);
        assert_eq!(repetitions[0].number_of_repetitions, 3);
    }

    #[test]
    fn test_assess_coverage_no_package_selected() {
        let client = client("client-1", "Alice", "Johnson");
        let packages = vec![packages_for(
            "client-1",
            &[("pkg-10", "10 Session Pilates", 8)],
        )];

        // Package payment with no package chosen
        let mut settings = HashMap::new();
        settings.insert(
            "client-1".to_string(),
            PaymentSettings {
                payment_method: PaymentMethod::Package,
                package_id: None,
                order_id: Some("order-77".to_string()),
            },
        );
        assert_eq!(
            assess_coverage(&client, &packages, &settings, 1),
            PackageCoverage::NoPackageSelected
        );

        // Package id that matches none of the client's packages
        settings.insert(
            "client-1".to_string(),
            package_settings("pkg-gone", "order-77"),
        );
        let coverage = assess_coverage(&client, &packages, &settings, 1);
        assert_eq!(coverage, PackageCoverage::NoPackageSelected);
        assert_eq!(coverage.warning().as_deref(), Some("no package selected"));
    }

    #[test]
    fn test_assess_coverage_not_package_payment() {
        let client = client("client-2", "Bora", "Kaya");
        let packages = vec![packages_for(
            "client-2",
            &[("pkg-10", "10 Session Pilates", 8)],
        )];

        // Explicit non-package method, regardless of count
        let mut settings = HashMap::new();
        settings.insert("client-2".to_string(), single_settings());
        for needed in [1, 10, 52] {
            let coverage = assess_coverage(&client, &packages, &settings, needed);
            assert_eq!(coverage, PackageCoverage::NotPackagePayment);
            assert_eq!(
                coverage.warning().as_deref(),
                Some("not using package payment")
            );
        }

        // Absent settings behave the same
        assert_eq!(
            assess_coverage(&client, &packages, &HashMap::new(), 1),
            PackageCoverage::NotPackagePayment
        );
    }

    #[test]
    fn test_collect_warnings_prefixes_and_order() {
        let clients = vec![
            client("client-1", "Alice", "Johnson"),
            client("client-2", "Bora", "Kaya"),
            client("client-3", "Cem", "Arslan"),
        ];
        let packages = vec![
            packages_for("client-1", &[("pkg-10", "10 Session Pilates", 2)]),
            packages_for("client-3", &[("pkg-20", "Monthly Reformer", 12)]),
        ];
        let mut settings = HashMap::new();
        settings.insert(
            "client-1".to_string(),
            package_settings("pkg-10", "order-77"),
        );
        settings.insert("client-2".to_string(), single_settings());
        settings.insert(
            "client-3".to_string(),
            package_settings("pkg-20", "order-78"),
        );

        let warnings = collect_warnings(&clients, &packages, &settings, 3);
        assert_eq!(
            warnings,
            vec![
                "Alice Johnson: insufficient sessions (2 available, 3 needed)".to_string(),
                "Bora Kaya: not using package payment".to_string(),
            ]
        );
    }

    #[test]
    fn test_collect_warnings_empty_when_covered() {
        let clients = vec![
            client("client-1", "Alice", "Johnson"),
            client("client-3", "Cem", "Arslan"),
        ];
        let packages = vec![
            packages_for("client-1", &[("pkg-10", "10 Session Pilates", 8)]),
            packages_for("client-3", &[("pkg-20", "Monthly Reformer", 12)]),
        ];
        let mut settings = HashMap::new();
        settings.insert(
            "client-1".to_string(),
            package_settings("pkg-10", "order-77"),
        );
        settings.insert(
            "client-3".to_string(),
            package_settings("pkg-20", "order-78"),
        );

        assert!(collect_warnings(&clients, &packages, &settings, 3).is_empty());
    }

    #[test]
    fn test_payment_method_wire_names() {
        let json = serde_json::to_string(&PaymentMethod::Package).unwrap();
        assert_eq!(json, "\"paketten-tahsil\"");
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Single).unwrap(),
            "\"single\""
        );

        let parsed: PaymentMethod = serde_json::from_str("\"paketten-tahsil\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Package);

        // Unknown upstream method strings collapse to the non-package variant
        let parsed: PaymentMethod = serde_json::from_str("\"havale\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Single);
    }

    #[test]
    fn test_recurrence_type_form_values() {
        assert_eq!(RecurrenceType::default(), RecurrenceType::Weekly);
        assert_eq!(
            RecurrenceType::from_form_value("monthly"),
            RecurrenceType::Monthly
        );
        assert_eq!(
            RecurrenceType::from_form_value("weekly"),
            RecurrenceType::Weekly
        );
        assert_eq!(
            RecurrenceType::from_form_value("garbage"),
            RecurrenceType::Weekly
        );
        assert_eq!(RecurrenceType::Monthly.as_str(), "monthly");
        assert_eq!(RecurrenceType::Weekly.label(), "Weekly");
    }
}
