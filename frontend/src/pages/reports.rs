use chrono::NaiveDate;
use maintdesk_shared::{ReportFormat, ReportRequest};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::toast::use_toaster;
use crate::hooks::use_report_types;
use crate::services::reports;

const FORMATS: [ReportFormat; 3] = [ReportFormat::Csv, ReportFormat::Pdf, ReportFormat::Xlsx];

fn parse_date(value: &str) -> Result<Option<NaiveDate>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("{value} is not a valid date"))
}

/// Validate the form before anything is sent.
pub fn build_request(
    report_type: &str,
    format: ReportFormat,
    start: &str,
    end: &str,
) -> Result<ReportRequest, String> {
    if report_type.trim().is_empty() {
        return Err("Please choose a report type".to_string());
    }
    let start_date = parse_date(start)?;
    let end_date = parse_date(end)?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            return Err("The end date must not be before the start date".to_string());
        }
    }
    Ok(ReportRequest {
        report_type: report_type.trim().to_string(),
        format,
        start_date,
        end_date,
    })
}

#[function_component(ReportsPage)]
pub fn reports_page() -> Html {
    let types = use_report_types();
    let toaster = use_toaster();
    let report_type = use_state(String::new);
    let format = use_state(|| ReportFormat::Csv);
    let start = use_state(String::new);
    let end = use_state(String::new);
    let generating = use_state(|| false);

    let on_type = {
        let report_type = report_type.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            report_type.set(select.value());
        })
    };
    let on_format = {
        let format = format.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let value = select.value();
            if let Some(f) = FORMATS.iter().find(|f| f.extension() == value) {
                format.set(*f);
            }
        })
    };
    let on_start = {
        let start = start.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            start.set(input.value());
        })
    };
    let on_end = {
        let end = end.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            end.set(input.value());
        })
    };

    let onsubmit = {
        let report_type = report_type.clone();
        let format = format.clone();
        let start = start.clone();
        let end = end.clone();
        let generating = generating.clone();
        let toaster = toaster.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let request = match build_request(&report_type, *format, &start, &end) {
                Ok(request) => request,
                Err(message) => {
                    toaster.error(message);
                    return;
                }
            };
            let generating = generating.clone();
            let toaster = toaster.clone();
            generating.set(true);
            spawn_local(async move {
                let outcome = reports::generate(&request).await;
                generating.set(false);
                match outcome {
                    Ok(filename) => toaster.success(format!("Downloaded {filename}")),
                    Err(e) => toaster.api_error("Failed to generate report", &e),
                }
            });
        })
    };

    html! {
        <div class="max-w-2xl space-y-4">
            <h1 class="text-2xl font-bold text-gray-900">{"Reports"}</h1>
            if let Some(error) = types.error.as_ref() {
                <p class="text-red-600 text-sm">{error.to_string()}</p>
            }
            <form class="bg-white shadow rounded p-4 space-y-3" {onsubmit}>
                <label class="block text-sm">
                    <span class="text-gray-700">{"Report"}</span>
                    <select class="mt-1 block w-full border rounded px-2 py-1" onchange={on_type}>
                        <option value="" selected={report_type.is_empty()}>{"Choose a report"}</option>
                        { for types.data.iter().map(|t| html! {
                            <option value={t.key.clone()} selected={*report_type == t.key}>{&t.name}</option>
                        }) }
                    </select>
                </label>
                { for types.data.iter().filter(|t| *report_type == t.key).filter_map(|t| t.description.clone()).map(|d| html! {
                    <p class="text-sm text-gray-500">{d}</p>
                }) }
                <label class="block text-sm">
                    <span class="text-gray-700">{"Format"}</span>
                    <select class="mt-1 block w-full border rounded px-2 py-1" onchange={on_format}>
                        { for FORMATS.iter().map(|f| html! {
                            <option value={f.extension()} selected={*format == *f}>{f.extension().to_uppercase()}</option>
                        }) }
                    </select>
                </label>
                <div class="flex space-x-3">
                    <label class="block text-sm flex-1">
                        <span class="text-gray-700">{"From"}</span>
                        <input type="date" class="mt-1 block w-full border rounded px-2 py-1" value={(*start).clone()} onchange={on_start} />
                    </label>
                    <label class="block text-sm flex-1">
                        <span class="text-gray-700">{"To"}</span>
                        <input type="date" class="mt-1 block w-full border rounded px-2 py-1" value={(*end).clone()} onchange={on_end} />
                    </label>
                </div>
                <button type="submit" class="px-4 py-2 bg-blue-600 text-white rounded text-sm disabled:opacity-50" disabled={*generating}>
                    if *generating { {"Generating..."} } else { {"Generate report"} }
                </button>
            </form>
        </div>
    }
}
