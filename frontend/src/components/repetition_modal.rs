use std::collections::HashMap;

use web_sys::{HtmlInputElement, HtmlSelectElement, MouseEvent};
use yew::prelude::*;

use crate::hooks::use_repetitions::use_customer_repetitions;
use crate::services::logging::Logger;
use shared::{
    assess_coverage, clamp_repetition_count, collect_warnings, Client, ClientPackages,
    PackageCoverage, PaymentSettings, RecurrenceType, RepetitionData, MAX_REPETITIONS,
    MIN_REPETITIONS,
};

#[derive(Properties, PartialEq)]
pub struct RepetitionModalProps {
    pub is_open: bool,
    pub selected_clients: Vec<Client>,
    pub client_packages: Vec<ClientPackages>,
    pub payment_settings: HashMap<String, PaymentSettings>,
    pub on_confirm: Callback<RepetitionData>,
    pub on_close: Callback<()>,
}

#[function_component(RepetitionModal)]
pub fn repetition_modal(props: &RepetitionModalProps) -> Html {
    let recurring_type = use_state(RecurrenceType::default);
    let repetition_count = use_state(|| MIN_REPETITIONS);
    let pending_warnings = use_state(|| Option::<Vec<String>>::None);

    // Reset state when modal opens
    use_effect_with(props.is_open, {
        let recurring_type = recurring_type.clone();
        let repetition_count = repetition_count.clone();
        let pending_warnings = pending_warnings.clone();
        move |is_open| {
            if *is_open {
                recurring_type.set(RecurrenceType::default());
                repetition_count.set(MIN_REPETITIONS);
                pending_warnings.set(None);
            }
            || ()
        }
    });

    let repetitions = use_customer_repetitions(
        props.selected_clients.clone(),
        props.payment_settings.clone(),
        *repetition_count,
    );

    let on_type_change = {
        let recurring_type = recurring_type.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            recurring_type.set(RecurrenceType::from_form_value(&select.value()));
        })
    };

    let on_count_change = {
        let repetition_count = repetition_count.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            repetition_count.set(clamp_repetition_count(&input.value()));
        })
    };

    let on_submit = {
        let selected_clients = props.selected_clients.clone();
        let client_packages = props.client_packages.clone();
        let payment_settings = props.payment_settings.clone();
        let recurring_type = recurring_type.clone();
        let repetition_count = repetition_count.clone();
        let repetitions = repetitions.clone();
        let pending_warnings = pending_warnings.clone();
        let on_confirm = props.on_confirm.clone();
        let on_close = props.on_close.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let warnings = collect_warnings(
                &selected_clients,
                &client_packages,
                &payment_settings,
                *repetition_count,
            );

            if warnings.is_empty() {
                let data = RepetitionData {
                    is_recurring: true,
                    recurring_type: *recurring_type,
                    repetitions: (*repetitions).clone(),
                };
                Logger::info_with_component(
                    "repetition-modal",
                    &format!(
                        "Scheduling {} {} repetitions for {} clients",
                        *repetition_count,
                        recurring_type.as_str(),
                        data.repetitions.len()
                    ),
                );
                on_confirm.emit(data);
                on_close.emit(());
            } else {
                Logger::warn_with_component(
                    "repetition-modal",
                    &format!("Package check raised {} warnings", warnings.len()),
                );
                pending_warnings.set(Some(warnings));
            }
        })
    };

    // Proceeding with unresolved warnings is allowed; the counts are emitted unchanged
    let on_proceed = {
        let recurring_type = recurring_type.clone();
        let repetitions = repetitions.clone();
        let pending_warnings = pending_warnings.clone();
        let on_confirm = props.on_confirm.clone();
        let on_close = props.on_close.clone();

        Callback::from(move |_: MouseEvent| {
            let data = RepetitionData {
                is_recurring: true,
                recurring_type: *recurring_type,
                repetitions: (*repetitions).clone(),
            };
            pending_warnings.set(None);
            on_confirm.emit(data);
            on_close.emit(());
        })
    };

    let on_keep_editing = {
        let pending_warnings = pending_warnings.clone();
        Callback::from(move |_: MouseEvent| {
            pending_warnings.set(None);
        })
    };

    let on_backdrop_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_close.emit(());
        })
    };

    let on_modal_click = Callback::from(|e: MouseEvent| {
        e.stop_propagation();
    });

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            on_close.emit(());
        })
    };

    if !props.is_open {
        return html! {};
    }

    html! {
        <div class="repetition-modal-backdrop" onclick={on_backdrop_click}>
            <div class="repetition-modal" onclick={on_modal_click}>
                <div class="repetition-modal-content">
                    <h3 class="repetition-modal-title">{"Schedule Recurring Sessions"}</h3>

                    {if let Some(warnings) = (*pending_warnings).clone() {
                        html! {
                            <div class="repetition-warning-prompt">
                                <p class="repetition-warning-intro">
                                    {"Some clients cannot cover this plan from their packages:"}
                                </p>
                                <ul class="repetition-warning-list">
                                    {for warnings.iter().map(|warning| {
                                        html! { <li>{warning}</li> }
                                    })}
                                </ul>
                                <div class="repetition-modal-buttons">
                                    <button
                                        type="button"
                                        class="btn btn-primary"
                                        onclick={on_proceed}
                                    >
                                        {"Schedule Anyway"}
                                    </button>
                                    <button
                                        type="button"
                                        class="btn btn-secondary"
                                        onclick={on_keep_editing}
                                    >
                                        {"Go Back"}
                                    </button>
                                </div>
                            </div>
                        }
                    } else {
                        html! {
                            <form class="repetition-form" onsubmit={on_submit}>
                                <div class="form-group">
                                    <label for="recurrence-type">{"Repeats"}</label>
                                    <select
                                        id="recurrence-type"
                                        class="repetition-select"
                                        value={recurring_type.as_str()}
                                        onchange={on_type_change}
                                    >
                                        {for [RecurrenceType::Weekly, RecurrenceType::Monthly]
                                            .iter()
                                            .map(|option| {
                                                html! {
                                                    <option
                                                        value={option.as_str()}
                                                        selected={*option == *recurring_type}
                                                    >
                                                        {option.label()}
                                                    </option>
                                                }
                                            })}
                                    </select>
                                </div>

                                <div class="form-group">
                                    <label for="repetition-count">{"Number of repetitions"}</label>
                                    <input
                                        id="repetition-count"
                                        type="number"
                                        class="repetition-input"
                                        value={(*repetition_count).to_string()}
                                        onchange={on_count_change}
                                        min={MIN_REPETITIONS.to_string()}
                                        max={MAX_REPETITIONS.to_string()}
                                        autofocus=true
                                    />
                                    <small class="form-text">
                                        {format!("Between {} and {}", MIN_REPETITIONS, MAX_REPETITIONS)}
                                    </small>
                                </div>

                                <div class="repetition-client-summary">
                                    {for props.selected_clients.iter().map(|client| {
                                        let coverage = assess_coverage(
                                            client,
                                            &props.client_packages,
                                            &props.payment_settings,
                                            *repetition_count,
                                        );
                                        html! {
                                            <div class="repetition-client-row">
                                                <span class="repetition-client-name">
                                                    {&client.full_name}
                                                </span>
                                                <span class={coverage_class(&coverage)}>
                                                    {coverage_text(&coverage)}
                                                </span>
                                            </div>
                                        }
                                    })}
                                </div>

                                <div class="repetition-modal-buttons">
                                    <button type="submit" class="btn btn-primary">
                                        {"Schedule"}
                                    </button>
                                    <button
                                        type="button"
                                        class="btn btn-secondary"
                                        onclick={on_cancel}
                                    >
                                        {"Cancel"}
                                    </button>
                                </div>
                            </form>
                        }
                    }}
                </div>
            </div>
        </div>
    }
}

/// Badge class for a coverage assessment
fn coverage_class(coverage: &PackageCoverage) -> &'static str {
    match coverage {
        PackageCoverage::Covered { .. } => "coverage-badge sufficient",
        PackageCoverage::InsufficientSessions { .. } => "coverage-badge insufficient",
        PackageCoverage::NoPackageSelected => "coverage-badge no-package",
        PackageCoverage::NotPackagePayment => "coverage-badge no-package-payment",
    }
}

/// Row label for a coverage assessment
fn coverage_text(coverage: &PackageCoverage) -> String {
    match coverage {
        PackageCoverage::Covered {
            package_name,
            remaining,
        } => format!("{} ({} sessions left)", package_name, remaining),
        PackageCoverage::InsufficientSessions {
            package_name,
            remaining,
            needed,
        } => format!("{} ({} left, {} needed)", package_name, remaining, needed),
        PackageCoverage::NoPackageSelected => "no package selected".to_string(),
        PackageCoverage::NotPackagePayment => "not using package payment".to_string(),
    }
}
