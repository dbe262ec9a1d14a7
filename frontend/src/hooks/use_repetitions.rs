use std::collections::HashMap;
use std::rc::Rc;

use yew::prelude::*;

use shared::{build_repetitions, Client, CustomerRepetition, PaymentSettings};

/// Derived per-client repetition list.
///
/// Recomputes whenever the selected roster, the payment settings, or the
/// requested count change; the memo dependency set is exactly those three
/// inputs, so the list can never go stale against them.
#[hook]
pub fn use_customer_repetitions(
    clients: Vec<Client>,
    settings: HashMap<String, PaymentSettings>,
    count: u32,
) -> Rc<Vec<CustomerRepetition>> {
    use_memo((clients, settings, count), |(clients, settings, count)| {
        build_repetitions(clients, settings, *count)
    })
}
