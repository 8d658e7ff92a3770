//! HTML rendering with templates compiled into the binary.

use std::collections::HashMap;

use actix_web::http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tera::{Context, Tera};

use crate::controller::CompanyPage;

const BASE_TEMPLATE: &str = include_str!("../templates/base.html");
const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const COMPANY_TEMPLATE: &str = include_str!("../templates/company.html");
const ERROR_TEMPLATE: &str = include_str!("../templates/error.html");

/// The page templates.
#[derive(Debug)]
pub struct Views {
    tera: Tera,
}

#[derive(Serialize)]
struct CompanyView<'a> {
    page: &'a CompanyPage,
    exchange: &'a str,
    price: String,
    day_move: Option<String>,
    day_move_class: &'static str,
}

impl Views {
    /// Compile the built-in templates.
    ///
    /// # Errors
    /// Returns an error if a template does not parse.
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BASE_TEMPLATE),
            ("index.html", INDEX_TEMPLATE),
            ("company.html", COMPANY_TEMPLATE),
            ("error.html", ERROR_TEMPLATE),
        ])?;
        tera.register_filter("thousands", thousands);
        Ok(Self { tera })
    }

    /// The search form.
    pub fn index(&self) -> tera::Result<String> {
        self.tera.render("index.html", &Context::new())
    }

    /// A company page.
    pub fn company(&self, page: &CompanyPage) -> tera::Result<String> {
        let view = CompanyView {
            page,
            exchange: page.company.exchange.as_deref().unwrap_or("N/A"),
            price: format!("{:.2}", page.price),
            // -0.0 would print as "-0.00".
            day_move: page
                .day_move
                .map(|m| if m == 0.0 { 0.0 } else { m })
                .map(|m| format!("{m:.2}")),
            day_move_class: match page.day_move {
                Some(m) if m > 0.0 => "up",
                Some(m) if m < 0.0 => "down",
                _ => "flat",
            },
        };
        self.tera
            .render("company.html", &Context::from_serialize(&view)?)
    }

    /// The generic error page.
    pub fn error(&self, status: StatusCode, message: &str) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("status", &status.as_u16());
        context.insert("reason", status.canonical_reason().unwrap_or("Error"));
        context.insert("message", message);
        self.tera.render("error.html", &context)
    }
}

/// Formats a number with thousands separators; fractional values keep two decimals.
fn thousands(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let number = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg(format!("thousands expects a number, got {value}")))?;
    Ok(Value::String(group_thousands(number)))
}

fn group_thousands(number: f64) -> String {
    let formatted = if number.fract() == 0.0 {
        format!("{number:.0}")
    } else {
        format!("{number:.2}")
    };
    let (sign, unsigned) = formatted
        .strip_prefix('-')
        .map_or(("", formatted.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
