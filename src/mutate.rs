// src/mutate.rs
use crate::dom::{Document, Selector};
use crate::error::DashboardError;
use crate::models::{UserId, UserRecord};
use crate::page::{
    self, FIELD_ADDRESS, FIELD_CITY, FIELD_EMAIL, FIELD_FIRSTNAME, FIELD_LASTNAME, FIELD_USER_ID,
};
use crate::render::{clear_portfolio, clear_stock_detail, find_list_item, render_user_list, set_active};
use log::info;

fn input_value(doc: &Document, id: &str) -> Option<String> {
    doc.query(&Selector::id(id))
        .and_then(|node| doc.value(node))
        .map(str::to_string)
}

/// Id currently held by the form, if any.
fn selected_id(doc: &Document) -> Result<UserId, DashboardError> {
    match input_value(doc, FIELD_USER_ID) {
        Some(id) if !id.is_empty() => Ok(UserId::new(id)),
        _ => Err(DashboardError::NoSelection),
    }
}

/// Overwrites the selected user's fields from the form and re-renders the
/// list with that user still highlighted.
pub fn save_user(doc: &mut Document, users: &mut [UserRecord]) -> Result<UserId, DashboardError> {
    let id = selected_id(doc)?;
    let record = users
        .iter_mut()
        .find(|record| record.id == id)
        .ok_or_else(|| DashboardError::UserNotFound(id.to_string()))?;

    let user = &mut record.user;
    for (field, target) in [
        (FIELD_FIRSTNAME, &mut user.firstname),
        (FIELD_LASTNAME, &mut user.lastname),
        (FIELD_ADDRESS, &mut user.address),
        (FIELD_CITY, &mut user.city),
        (FIELD_EMAIL, &mut user.email),
    ] {
        if let Some(value) = input_value(doc, field) {
            *target = value;
        }
    }

    render_user_list(doc, users)?;
    if let Some(item) = find_list_item(doc, id.as_str()) {
        set_active(doc, item);
    }
    info!("User {} saved.", id);
    Ok(id)
}

/// Removes the selected user and clears every view that showed it.
pub fn delete_user(
    doc: &mut Document,
    users: &mut Vec<UserRecord>,
) -> Result<UserRecord, DashboardError> {
    let id = selected_id(doc)?;
    let index = users
        .iter()
        .position(|record| record.id == id)
        .ok_or_else(|| DashboardError::UserNotFound(id.to_string()))?;

    let removed = users.remove(index);

    if let Some(form) = page::find_user_form(doc) {
        doc.reset_form(form);
    }
    clear_portfolio(doc);
    clear_stock_detail(doc);

    render_user_list(doc, users)?;
    info!("User {} deleted.", id);
    Ok(removed)
}
