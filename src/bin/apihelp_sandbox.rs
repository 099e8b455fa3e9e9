//! Sandbox: documents a handful of sample DTOs and prints the resulting help
//! items as JSON.
//!
//! ```text
//! apihelp-sandbox --locale ru-RU --pretty
//! ```

#![allow(dead_code)]

use anyhow::{Context, Result};
use apihelp::catalog::TypesDocumentationBuilder;
use apihelp::config::HelpConfig;
use apihelp::logging::{init_logging, LogConfig};
use apihelp::model::AnnotationRenderers;
use apihelp::reflect::{KeyValuePair, TypeRef};
use apihelp::sample::SampleRegistry;
use apihelp::{Describe, DocumentationSessions};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Command-line interface of the sandbox
#[derive(Parser)]
#[command(name = "apihelp-sandbox")]
#[command(about = "Prints data type documentation for the sandbox DTOs", long_about = None)]
struct Cli {
    /// Locale of the generated prose (defaults to the configured locale)
    #[arg(short, long, env = "APIHELP_LOCALE")]
    locale: Option<String>,

    /// Configuration file (YAML, TOML or JSON); falls back to `APIHELP_CONFIG`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Table of contents path of the data types section
    #[arg(long)]
    toc: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

/// User DTO
#[derive(Describe, Serialize)]
#[serde(rename_all = "PascalCase")]
#[describe(lang = "ru", doc = "Информация о персоне")]
struct User {
    /// Age of the person
    #[describe(lang = "ru", doc = "Возраст персоны")]
    age: i32,
    /// Name of the person
    #[describe(lang = "ru", doc = "Имя персоны")]
    name: String,
    /// A gender of the person
    #[describe(lang = "ru", doc = "Пол персоны")]
    gender: Gender,
    /// Extra data, associated with the person
    #[describe(lang = "ru", doc = "Дополнительные данные, ассоциированные с пользователем")]
    extra: ExtraData,
    /// List of document extra fields
    #[describe(lang = "ru", doc = "Список дополнительных полей документа")]
    extra_values_list: ExtraValuesList,
}

/// Contact DTO
#[derive(Describe, Serialize)]
#[serde(rename_all = "PascalCase")]
#[describe(lang = "ru", doc = "Информация о контакте персоны")]
struct Contact {
    /// Person's phone number
    #[describe(required, lang = "ru", doc = "Номер телефона")]
    phone: String,
    /// Person's email
    #[describe(data_type = "EmailAddress", lang = "ru", doc = "Адрес электронной почты")]
    email: String,
    /// Extra data, associated with the contact
    #[describe(lang = "ru", doc = "Дополнительные данные, ассоциированные с контактом")]
    extra: ExtraData,
}

/// A type to represent a gender of the user.
#[derive(Describe, Serialize)]
#[describe(lang = "ru", doc = "Тип для представления пола пользователя.")]
enum Gender {
    /// The gender is unknown.
    #[describe(lang = "ru", doc = "Пол неизвесен.")]
    Unknown = 0,
    /// Male gender
    #[describe(lang = "ru", doc = "Мужчина.")]
    Male = 1,
    /// Female gender
    #[describe(lang = "ru", doc = "Женщина")]
    Female = 2,
    /// Androgynous gender (both male and female)
    #[describe(lang = "ru", doc = "Двуполое существо.")]
    Bisexual = 3,
}

/// Free-form data attached to a record
#[derive(Describe, Serialize)]
#[serde(rename_all = "PascalCase")]
#[describe(lang = "ru", doc = "Произвольные данные записи")]
struct ExtraData {
    /// Payload
    #[describe(max_length = 1024)]
    data: String,
}

/// Named extra values of a document
#[derive(Describe, Serialize)]
#[serde(rename_all = "PascalCase")]
#[describe(lang = "ru", doc = "Именованные дополнительные значения документа")]
struct ExtraValuesList {
    /// Values in declaration order
    values: Vec<KeyValuePair<String, String>>,
}

/// Pagination model
#[derive(Describe, Serialize)]
#[serde(rename_all = "PascalCase")]
#[describe(lang = "ru", doc = "Страница списка")]
struct PagingResponseModel<T> {
    /// Underlining objects collection
    #[describe(property, lang = "ru", doc = "Элементы списка")]
    items: Vec<T>,
    /// Number of current page
    #[describe(property, range(1, 10000), lang = "ru", doc = "Номер страницы")]
    page: u32,
    /// Total number of available pages
    #[describe(property, lang = "ru", doc = "Общее количество страниц")]
    total_pages: u32,
    /// Total objects count
    #[describe(property, lang = "ru", doc = "Общее количество элементов в списке")]
    total_count: u64,
}

fn documented_types() -> Vec<TypeRef> {
    vec![
        TypeRef::of::<Contact>(),
        TypeRef::of::<User>(),
        TypeRef::of::<Gender>(),
        TypeRef::of::<Vec<User>>(),
        TypeRef::of::<HashMap<String, Contact>>(),
        TypeRef::of::<ExtraValuesList>(),
        TypeRef::of::<PagingResponseModel<User>>(),
    ]
}

fn sample_overrides() -> Result<SampleRegistry> {
    let mut samples = SampleRegistry::new();
    samples.insert::<Contact, _>(&json!({
        "Phone": "0123456789",
        "Email": "test@example.com",
    }))?;
    samples.insert::<ExtraData, _>(&json!({ "Data": "Some additional data" }))?;
    Ok(samples)
}

fn main() -> Result<()> {
    init_logging(&LogConfig::from_env())?;
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => HelpConfig::load(path)?,
        None => HelpConfig::from_env()?,
    };
    if let Some(toc) = cli.toc {
        config.toc_path = toc;
    }
    let locale = cli.locale.unwrap_or_else(|| config.default_locale.clone());
    let toc_path = config.toc_path.clone();

    let sessions = DocumentationSessions::with_parts(
        config,
        documented_types(),
        Arc::new(AnnotationRenderers::default()),
        Arc::new(sample_overrides().context("Failed to register sample overrides")?),
    );
    let session = sessions
        .session(&locale)
        .with_context(|| format!("Failed to create documentation session for '{}'", locale))?;
    let mut samples = sessions.sample_generator();

    let builder = TypesDocumentationBuilder::new(documented_types(), Some(&toc_path));
    let items = builder
        .build_help(&mut session.lock(), &mut samples)
        .context("Failed to build data type documentation")?;
    info!(locale = %locale, items = items.len(), "built data type documentation");

    let output = if cli.pretty {
        serde_json::to_string_pretty(&items)?
    } else {
        serde_json::to_string(&items)?
    };
    println!("{}", output);
    Ok(())
}
