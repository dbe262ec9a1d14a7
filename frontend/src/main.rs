use std::collections::HashMap;

use web_sys::MouseEvent;
use yew::prelude::*;

use shared::{
    Client, ClientPackage, ClientPackages, PaymentMethod, PaymentSettings, RepetitionData,
};

mod components;
mod hooks;
mod services;

use components::repetition_modal::RepetitionModal;
use services::logging::Logger;

// Demo roster standing in for the data the booking view of the full product
// would pass down. Bora's package is nearly used up and Cem pays per session,
// so scheduling more than two repetitions exercises the warning prompt.
fn demo_clients() -> Vec<Client> {
    [
        ("client-001", "Alice", "Johnson"),
        ("client-002", "Bora", "Kaya"),
        ("client-003", "Cem", "Arslan"),
        ("client-004", "Derya", "Acar"),
    ]
    .iter()
    .map(|(id, name, surname)| Client {
        id: id.to_string(),
        full_name: format!("{} {}", name, surname),
        name: name.to_string(),
        surname: surname.to_string(),
    })
    .collect()
}

fn demo_packages() -> Vec<ClientPackages> {
    vec![
        ClientPackages {
            client_id: "client-001".to_string(),
            packages: vec![ClientPackage {
                package_id: "pkg-10".to_string(),
                package_name: "10 Session Pilates".to_string(),
                remaining_sessions: 8,
            }],
        },
        ClientPackages {
            client_id: "client-002".to_string(),
            packages: vec![ClientPackage {
                package_id: "pkg-5".to_string(),
                package_name: "5 Session Yoga".to_string(),
                remaining_sessions: 2,
            }],
        },
        ClientPackages {
            client_id: "client-004".to_string(),
            packages: vec![ClientPackage {
                package_id: "pkg-12".to_string(),
                package_name: "Monthly Reformer".to_string(),
                remaining_sessions: 12,
            }],
        },
    ]
}

fn demo_payment_settings() -> HashMap<String, PaymentSettings> {
    let mut settings = HashMap::new();
    settings.insert(
        "client-001".to_string(),
        PaymentSettings {
            payment_method: PaymentMethod::Package,
            package_id: Some("pkg-10".to_string()),
            order_id: Some("order-1001".to_string()),
        },
    );
    settings.insert(
        "client-002".to_string(),
        PaymentSettings {
            payment_method: PaymentMethod::Package,
            package_id: Some("pkg-5".to_string()),
            order_id: Some("order-1002".to_string()),
        },
    );
    settings.insert(
        "client-003".to_string(),
        PaymentSettings {
            payment_method: PaymentMethod::Single,
            package_id: None,
            order_id: None,
        },
    );
    // client-004 chose package payment but never picked a package
    settings.insert(
        "client-004".to_string(),
        PaymentSettings {
            payment_method: PaymentMethod::Package,
            package_id: None,
            order_id: Some("order-1004".to_string()),
        },
    );
    settings
}

#[function_component(App)]
fn app() -> Html {
    let clients = demo_clients();
    let client_packages = demo_packages();
    let payment_settings = demo_payment_settings();

    let selected_ids = use_state(Vec::<String>::new);
    let modal_open = use_state(|| false);
    let last_plan = use_state(|| Option::<RepetitionData>::None);
    let show_scheduled_flash = use_state(|| false);

    // Selection in roster order, which is also the order the plan lists clients in
    let selected_clients: Vec<Client> = clients
        .iter()
        .filter(|client| selected_ids.contains(&client.id))
        .cloned()
        .collect();

    let on_open_planner = {
        let modal_open = modal_open.clone();
        Callback::from(move |_: MouseEvent| {
            modal_open.set(true);
        })
    };

    let on_close_planner = {
        let modal_open = modal_open.clone();
        Callback::from(move |_: ()| {
            modal_open.set(false);
        })
    };

    let on_confirm = {
        let last_plan = last_plan.clone();
        let show_scheduled_flash = show_scheduled_flash.clone();

        Callback::from(move |data: RepetitionData| {
            match serde_json::to_string_pretty(&data) {
                Ok(payload) => Logger::info_with_component(
                    "app",
                    &format!(
                        "Plan confirmed at {}:\n{}",
                        chrono::Local::now().to_rfc3339(),
                        payload
                    ),
                ),
                Err(e) => Logger::error_with_component(
                    "app",
                    &format!("Failed to serialize plan: {}", e),
                ),
            }

            last_plan.set(Some(data));
            show_scheduled_flash.set(true);

            // Clear the flash after a few seconds
            let show_scheduled_flash = show_scheduled_flash.clone();
            gloo::timers::callback::Timeout::new(3000, move || {
                show_scheduled_flash.set(false);
            })
            .forget();
        })
    };

    html! {
        <>
            <header class="header">
                <div class="container">
                    <h1>{"Booking Planner"}</h1>
                </div>
            </header>

            <main class="main">
                <div class="container">
                    <section class="roster-section">
                        <h2>{"Clients"}</h2>
                        <div class="client-select-list">
                            {for clients.iter().map(|client| {
                                let client_id = client.id.clone();
                                let on_toggle = {
                                    let selected_ids = selected_ids.clone();
                                    Callback::from(move |_: Event| {
                                        let mut ids = (*selected_ids).clone();
                                        match ids.iter().position(|id| id == &client_id) {
                                            Some(index) => {
                                                ids.remove(index);
                                            }
                                            None => ids.push(client_id.clone()),
                                        }
                                        selected_ids.set(ids);
                                    })
                                };

                                html! {
                                    <label class="client-select-row" key={client.id.clone()}>
                                        <input
                                            type="checkbox"
                                            checked={selected_ids.contains(&client.id)}
                                            onchange={on_toggle}
                                        />
                                        {&client.full_name}
                                    </label>
                                }
                            })}
                        </div>

                        <button
                            class="btn btn-primary"
                            onclick={on_open_planner}
                            disabled={selected_ids.is_empty()}
                        >
                            {"Schedule Recurring Sessions"}
                        </button>
                    </section>

                    {if *show_scheduled_flash {
                        html! {
                            <div class="form-message success">
                                {"Recurring sessions scheduled!"}
                            </div>
                        }
                    } else {
                        html! {}
                    }}

                    {if let Some(plan) = last_plan.as_ref() {
                        html! {
                            <section class="plan-section">
                                <h2>{"Last Scheduled Plan"}</h2>
                                <p class="plan-cadence">
                                    {format!("Repeats {}", plan.recurring_type.label().to_lowercase())}
                                </p>
                                <div class="table-container">
                                    <table class="plan-table">
                                        <thead>
                                            <tr>
                                                <th>{"Client"}</th>
                                                <th>{"Repetitions"}</th>
                                                <th>{"Package"}</th>
                                                <th>{"Order"}</th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {for plan.repetitions.iter().map(|entry| {
                                                html! {
                                                    <tr>
                                                        <td>{&entry.customer_name}</td>
                                                        <td>{entry.number_of_repetitions}</td>
                                                        <td>{entry.package_id.clone().unwrap_or_else(|| "-".to_string())}</td>
                                                        <td>{entry.order_id.clone().unwrap_or_else(|| "-".to_string())}</td>
                                                    </tr>
                                                }
                                            })}
                                        </tbody>
                                    </table>
                                </div>
                            </section>
                        }
                    } else {
                        html! {}
                    }}
                </div>
            </main>

            <RepetitionModal
                is_open={*modal_open}
                selected_clients={selected_clients}
                client_packages={client_packages}
                payment_settings={payment_settings}
                on_confirm={on_confirm}
                on_close={on_close_planner}
            />
        </>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
