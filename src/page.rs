// src/page.rs
//! Element names the dashboard binds to, and the default page skeleton that
//! provides all of them.

use crate::dom::{Document, Element, NodeId, Selector};

pub const USER_LIST: &str = "user-list";
pub const USER_ITEM: &str = "user-item";
pub const ACTIVE: &str = "active";

pub const USER_FORM: &str = "user-form";
pub const FIELD_USER_ID: &str = "userID";
pub const FIELD_FIRSTNAME: &str = "firstname";
pub const FIELD_LASTNAME: &str = "lastname";
pub const FIELD_ADDRESS: &str = "address";
pub const FIELD_CITY: &str = "city";
pub const FIELD_EMAIL: &str = "email";

pub const PORTFOLIO_LIST: &str = "portfolio-list";
pub const PORTFOLIO_ROW: &str = "portfolio-row";
pub const PORTFOLIO_SYMBOL: &str = "portfolio-symbol";
pub const PORTFOLIO_SHARES: &str = "portfolio-shares";
pub const VIEW_STOCK: &str = "view-stock";

pub const STOCK_AREA: &str = "stock-form";
pub const STOCK_NAME: &str = "stockName";
pub const STOCK_SECTOR: &str = "stockSector";
pub const STOCK_INDUSTRY: &str = "stockIndustry";
pub const STOCK_ADDRESS: &str = "stockAddress";
pub const LOGO: &str = "logo";

pub const LOGO_PREFIX: &str = "logos/";
pub const LOGO_SUFFIX: &str = ".svg";

pub const STOCK_NOT_FOUND: &str = "Stock not found";

pub fn logo_path(symbol: &str) -> String {
    format!("{}{}{}", LOGO_PREFIX, symbol, LOGO_SUFFIX)
}

/// Candidates for the save control, checked as one selector list.
pub fn save_controls() -> Vec<Selector> {
    vec![
        Selector::id("saveButton"),
        Selector::id("save"),
        Selector::tag("button").and_attr("type", "submit"),
        Selector::attr("data-action", "save-user"),
    ]
}

pub fn delete_controls() -> Vec<Selector> {
    vec![
        Selector::id("deleteButton"),
        Selector::id("deleteUser"),
        Selector::id("delete"),
        Selector::attr("data-action", "delete-user"),
    ]
}

/// `#user-form`, or failing that the first form on the page.
pub fn find_user_form(doc: &Document) -> Option<NodeId> {
    doc.query(&Selector::id(USER_FORM))
        .or_else(|| doc.query(&Selector::tag("form")))
}

/// Fills the stock detail area with its heading, fields and logo.
pub fn append_stock_fields(doc: &mut Document, area: NodeId) {
    doc.append(area, Element::new("img").with_id(LOGO).with_attr("alt", ""));
    doc.append(area, Element::new("h3").with_id(STOCK_NAME));
    doc.append(area, Element::new("p").with_id(STOCK_SECTOR));
    doc.append(area, Element::new("p").with_id(STOCK_INDUSTRY));
    doc.append(area, Element::new("p").with_id(STOCK_ADDRESS));
}

/// The default dashboard layout.
pub fn build() -> Document {
    let mut doc = Document::new();
    let root = doc.root();

    let users = doc.append(root, Element::new("section").with_class("users"));
    doc.append(users, Element::new("h2").with_text("Users"));
    doc.append(users, Element::new("ul").with_class(USER_LIST));

    let form = doc.append(
        root,
        Element::new("form").with_id(USER_FORM).with_class("user-form"),
    );
    let inputs = [
        (FIELD_USER_ID, "hidden"),
        (FIELD_FIRSTNAME, "text"),
        (FIELD_LASTNAME, "text"),
        (FIELD_ADDRESS, "text"),
        (FIELD_CITY, "text"),
        (FIELD_EMAIL, "email"),
    ];
    for (id, kind) in inputs {
        if kind != "hidden" {
            doc.append(
                form,
                Element::new("label").with_attr("for", id).with_text(id),
            );
        }
        doc.append(
            form,
            Element::new("input")
                .with_id(id)
                .with_attr("name", id)
                .with_attr("type", kind),
        );
    }
    doc.append(
        form,
        Element::new("button")
            .with_id("saveButton")
            .with_attr("type", "submit")
            .with_text("Save"),
    );
    doc.append(
        form,
        Element::new("button")
            .with_id("deleteButton")
            .with_attr("type", "button")
            .with_text("Delete"),
    );

    let portfolio = doc.append(root, Element::new("section").with_class("portfolio"));
    doc.append(portfolio, Element::new("h2").with_text("Portfolio"));
    doc.append(portfolio, Element::new("div").with_class(PORTFOLIO_LIST));

    let stock = doc.append(root, Element::new("section").with_class("stock"));
    let area = doc.append(stock, Element::new("div").with_class(STOCK_AREA));
    append_stock_fields(&mut doc, area);

    doc
}

/// Wraps the document body into a complete HTML page.
pub fn render_page(doc: &Document) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Stock Dashboard</title></head>{}</html>",
        doc.to_html()
    )
}
