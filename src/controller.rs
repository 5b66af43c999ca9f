// src/controller.rs
//! Boot and event wiring for the dashboard.
//!
//! [`Dashboard`] owns the document and both collections. Listeners sit on
//! container elements and resolve the actual item from the event target, so
//! they survive every re-render of the containers' children.

use crate::data::AppState;
use crate::dom::{Document, NodeId, Selector};
use crate::error::DashboardError;
use crate::models::{find_user, Stock, UserRecord};
use crate::page::{self, PORTFOLIO_LIST, USER_ITEM, USER_LIST};
use crate::{mutate, render};
use log::{debug, info};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    SelectUser,
    ViewStock,
    Save,
    Delete,
}

#[derive(Debug, Clone, Copy)]
struct Listener {
    node: NodeId,
    kind: EventKind,
    handler: Handler,
    prevent_default: bool,
}

/// An operator action arriving from outside, addressed by selector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UiEvent {
    Click { target: Selector },
    Submit { target: Selector },
    Input { target: Selector, value: String },
}

pub struct Dashboard {
    document: Document,
    state: AppState,
    listeners: Vec<Listener>,
}

fn report<T>(context: &str, result: Result<T, DashboardError>) -> Option<T> {
    result.map_err(|e| e.log(context)).ok()
}

impl Dashboard {
    pub fn boot(document: Document, state: AppState) -> Self {
        let mut dashboard = Dashboard {
            document,
            state,
            listeners: Vec::new(),
        };
        report(
            "Rendering user list",
            render::render_user_list(&mut dashboard.document, &dashboard.state.users),
        );
        dashboard.wire();
        info!(
            "Dashboard initialized. Users: {} Stocks: {}",
            dashboard.state.users.len(),
            dashboard.state.stocks.len()
        );
        dashboard
    }

    fn listen(&mut self, node: NodeId, kind: EventKind, handler: Handler, prevent_default: bool) {
        debug!("Listening for {:?} on node {} ({:?}).", kind, node, handler);
        self.listeners.push(Listener {
            node,
            kind,
            handler,
            prevent_default,
        });
    }

    fn wire(&mut self) {
        if let Some(list) = self.document.query(&Selector::class(USER_LIST)) {
            self.listen(list, EventKind::Click, Handler::SelectUser, false);
        }
        if let Some(portfolio) = self.document.query(&Selector::class(PORTFOLIO_LIST)) {
            self.listen(portfolio, EventKind::Click, Handler::ViewStock, false);
        }

        if let Some(save) = self.document.query_any(&page::save_controls()) {
            self.listen(save, EventKind::Click, Handler::Save, true);
        } else if let Some(form) = page::find_user_form(&self.document) {
            self.listen(form, EventKind::Submit, Handler::Save, true);
        }

        if let Some(delete) = self.document.query_any(&page::delete_controls()) {
            self.listen(delete, EventKind::Click, Handler::Delete, true);
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.state.users
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.state.stocks
    }

    /// Sets an input's value the way typing into it would.
    pub fn input(&mut self, target: NodeId, value: &str) {
        self.document.set_value(target, value);
    }

    pub fn click(&mut self, target: NodeId) -> bool {
        self.dispatch(EventKind::Click, target)
    }

    pub fn submit(&mut self, target: NodeId) -> bool {
        self.dispatch(EventKind::Submit, target)
    }

    /// Runs the listeners on `target` and then on each ancestor, followed by
    /// the default action unless a listener prevented it. Returns whether the
    /// default action was allowed.
    pub fn dispatch(&mut self, kind: EventKind, target: NodeId) -> bool {
        let mut prevented = false;
        for node in self.document.propagation_path(target) {
            let matching: Vec<Listener> = self
                .listeners
                .iter()
                .filter(|listener| listener.node == node && listener.kind == kind)
                .copied()
                .collect();
            for listener in matching {
                prevented |= listener.prevent_default;
                self.run(listener.handler, target);
            }
        }

        if !prevented && kind == EventKind::Click {
            self.submit_default(target);
        }
        !prevented
    }

    /// A click on a submit button submits its form.
    fn submit_default(&mut self, target: NodeId) {
        let submit_button = Selector::tag("button").and_attr("type", "submit");
        let form = self
            .document
            .closest(target, &submit_button)
            .and_then(|button| self.document.closest(button, &Selector::tag("form")));
        if let Some(form) = form {
            self.dispatch(EventKind::Submit, form);
        }
    }

    fn run(&mut self, handler: Handler, target: NodeId) {
        match handler {
            Handler::SelectUser => self.select_user(target),
            Handler::ViewStock => self.view_stock(target),
            Handler::Save => {
                report(
                    "Saving user",
                    mutate::save_user(&mut self.document, &mut self.state.users),
                );
            }
            Handler::Delete => {
                report(
                    "Deleting user",
                    mutate::delete_user(&mut self.document, &mut self.state.users),
                );
            }
        }
    }

    fn select_user(&mut self, target: NodeId) {
        let item_selector = Selector::tag("li").and_class(USER_ITEM);
        let Some(item) = self.document.closest(target, &item_selector) else {
            return;
        };
        render::set_active(&mut self.document, item);
        debug!("Selected {:?}.", self.document.text_content(item));

        let Some(id) = self.document.attr(item, "data-id") else {
            return;
        };
        let Some(record) = find_user(&self.state.users, id) else {
            debug!("List item {} has no matching user.", id);
            return;
        };
        render::populate_form(&mut self.document, Some(record));
        report(
            "Rendering portfolio",
            render::render_portfolio(&mut self.document, record),
        );
    }

    fn view_stock(&mut self, target: NodeId) {
        let button = Selector::tag("button").and_has_attr("data-symbol");
        let Some(symbol) = self
            .document
            .closest(target, &button)
            .and_then(|node| self.document.attr(node, "data-symbol"))
            .map(str::to_string)
        else {
            return;
        };
        report(
            "Viewing stock",
            render::view_stock(&mut self.document, &symbol, &self.state.stocks),
        );
    }

    fn resolve(&self, target: &Selector) -> Result<NodeId, DashboardError> {
        self.document
            .query(target)
            .ok_or_else(|| DashboardError::UnknownTarget(target.to_string()))
    }

    /// Applies an event from outside; only an unresolvable target is an error.
    pub fn apply(&mut self, event: UiEvent) -> Result<(), DashboardError> {
        match event {
            UiEvent::Click { target } => {
                let node = self.resolve(&target)?;
                self.click(node);
            }
            UiEvent::Submit { target } => {
                let node = self.resolve(&target)?;
                self.submit(node);
            }
            UiEvent::Input { target, value } => {
                let node = self.resolve(&target)?;
                self.input(node, &value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataSources;
    use crate::dom::Element;
    use crate::page::{
        ACTIVE, FIELD_FIRSTNAME, FIELD_LASTNAME, FIELD_USER_ID, PORTFOLIO_ROW, PORTFOLIO_SHARES,
        PORTFOLIO_SYMBOL, STOCK_AREA, STOCK_NAME, VIEW_STOCK,
    };

    fn example_state() -> AppState {
        AppState::load(&DataSources {
            users: Some(
                r#"[{"id":1,"user":{"firstname":"A","lastname":"B","portfolio":[{"symbol":"X","owned":10}]}}]"#
                    .to_string(),
            ),
            stocks: Some(r#"[{"symbol":"X","name":"Xco"}]"#.to_string()),
        })
    }

    fn three_users() -> AppState {
        AppState::load(&DataSources {
            users: Some(
                r#"[
                    {"id":1,"user":{"firstname":"Ada","lastname":"Lovelace","portfolio":[{"symbol":"X","owned":1},{"symbol":"Q","owned":2}]}},
                    {"id":2,"user":{"firstname":"Alan","lastname":"Turing"}},
                    {"id":3,"user":{"firstname":"Grace","lastname":"Hopper"}}
                ]"#
                .to_string(),
            ),
            stocks: Some(r#"[{"symbol":"X","company":"Xco Holdings"}]"#.to_string()),
        })
    }

    fn node(dashboard: &Dashboard, selector: Selector) -> NodeId {
        dashboard.document().query(&selector).unwrap()
    }

    fn value_of(dashboard: &Dashboard, id: &str) -> String {
        let input = node(dashboard, Selector::id(id));
        dashboard.document().value(input).unwrap().to_string()
    }

    fn item(dashboard: &Dashboard, id: &str) -> NodeId {
        node(dashboard, Selector::class(USER_ITEM).and_attr("data-id", id))
    }

    #[test]
    fn example_walkthrough() {
        let mut dashboard = Dashboard::boot(page::build(), example_state());
        let doc = dashboard.document();
        let items = doc.query_all(&Selector::class(USER_ITEM));
        assert_eq!(items.len(), 1);
        assert_eq!(doc.text_content(items[0]), "B, A");

        dashboard.click(items[0]);
        assert_eq!(value_of(&dashboard, FIELD_FIRSTNAME), "A");
        assert_eq!(value_of(&dashboard, FIELD_LASTNAME), "B");

        let doc = dashboard.document();
        let rows = doc.query_all(&Selector::class(PORTFOLIO_ROW));
        assert_eq!(rows.len(), 1);
        let symbol = doc.query_in(rows[0], &Selector::class(PORTFOLIO_SYMBOL)).unwrap();
        let shares = doc.query_in(rows[0], &Selector::class(PORTFOLIO_SHARES)).unwrap();
        assert_eq!(
            format!("{} / {}", doc.text_content(symbol), doc.text_content(shares)),
            "X / 10"
        );

        let view = doc.query_in(rows[0], &Selector::class(VIEW_STOCK)).unwrap();
        dashboard.click(view);
        let name = node(&dashboard, Selector::id(STOCK_NAME));
        assert_eq!(dashboard.document().text_content(name), "Xco");
    }

    #[test]
    fn selection_is_exclusive_and_follows_clicks() {
        let mut dashboard = Dashboard::boot(page::build(), three_users());

        dashboard.click(item(&dashboard, "1"));
        dashboard.click(item(&dashboard, "3"));

        let active = dashboard.document().query_all(&Selector::class(ACTIVE));
        assert_eq!(active, vec![item(&dashboard, "3")]);
        assert_eq!(value_of(&dashboard, FIELD_FIRSTNAME), "Grace");
        assert!(dashboard
            .document()
            .query(&Selector::class(PORTFOLIO_ROW))
            .is_none());
    }

    #[test]
    fn clicks_inside_an_item_resolve_to_the_item() {
        let mut dashboard = Dashboard::boot(page::build(), three_users());
        let item = item(&dashboard, "2");
        // Children added after boot still bubble to the list listener.
        let badge = dashboard.document.append(item, Element::new("span"));

        dashboard.click(badge);

        assert_eq!(value_of(&dashboard, FIELD_USER_ID), "2");
        assert!(dashboard.document().has_class(item, ACTIVE));
    }

    #[test]
    fn clicking_the_list_background_does_nothing() {
        let mut dashboard = Dashboard::boot(page::build(), three_users());
        let list = node(&dashboard, Selector::class(USER_LIST));

        dashboard.click(list);

        assert_eq!(value_of(&dashboard, FIELD_USER_ID), "");
        assert!(dashboard.document().query(&Selector::class(ACTIVE)).is_none());
    }

    #[test]
    fn unknown_portfolio_symbol_shows_not_found() {
        let mut dashboard = Dashboard::boot(page::build(), three_users());
        dashboard.click(item(&dashboard, "1"));

        let view = node(
            &dashboard,
            Selector::class(VIEW_STOCK).and_attr("data-symbol", "Q"),
        );
        dashboard.click(view);

        let area = node(&dashboard, Selector::class(STOCK_AREA));
        assert_eq!(dashboard.document().text_content(area), "Stock not found");
    }

    #[test]
    fn save_button_saves_without_submitting() {
        let mut dashboard = Dashboard::boot(page::build(), three_users());
        dashboard.click(item(&dashboard, "2"));
        let first = node(&dashboard, Selector::id(FIELD_FIRSTNAME));
        dashboard.input(first, "Alan Mathison");

        let allowed = dashboard.click(node(&dashboard, Selector::id("saveButton")));

        assert!(!allowed);
        assert_eq!(dashboard.users().len(), 3);
        assert_eq!(dashboard.users()[1].user.firstname, "Alan Mathison");
        assert_eq!(dashboard.users()[0].user.firstname, "Ada");
        let refreshed = item(&dashboard, "2");
        assert_eq!(
            dashboard.document().text_content(refreshed),
            "Turing, Alan Mathison"
        );
        assert!(dashboard.document().has_class(refreshed, ACTIVE));
    }

    fn form_without_buttons() -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append(root, Element::new("ul").with_class(USER_LIST));
        let form = doc.append(root, Element::new("form").with_id("user-form"));
        doc.append(form, Element::new("input").with_id(FIELD_USER_ID));
        doc.append(form, Element::new("input").with_id(FIELD_FIRSTNAME));
        doc.append(form, Element::new("input").with_id(FIELD_LASTNAME));
        doc
    }

    #[test]
    fn form_submit_saves_when_no_save_button_exists() {
        let mut dashboard = Dashboard::boot(form_without_buttons(), three_users());
        dashboard.click(item(&dashboard, "3"));
        let last = node(&dashboard, Selector::id(FIELD_LASTNAME));
        dashboard.input(last, "Murray Hopper");

        let allowed = dashboard.submit(node(&dashboard, Selector::id("user-form")));

        assert!(!allowed);
        assert_eq!(dashboard.users()[2].user.lastname, "Murray Hopper");
    }

    #[test]
    fn plain_submit_button_click_submits_the_form() {
        let mut dashboard = Dashboard::boot(form_without_buttons(), three_users());
        let form = node(&dashboard, Selector::id("user-form"));
        // A submit button added after boot is not the wired save control.
        let button = dashboard.document.append(
            form,
            Element::new("button").with_attr("type", "submit").with_text("Go"),
        );
        dashboard.click(item(&dashboard, "2"));
        let first = node(&dashboard, Selector::id(FIELD_FIRSTNAME));
        dashboard.input(first, "A. M.");

        dashboard.click(button);

        assert_eq!(dashboard.users()[1].user.firstname, "A. M.");
    }

    #[test]
    fn delete_button_removes_the_selected_user() {
        let mut dashboard = Dashboard::boot(page::build(), three_users());
        dashboard.click(item(&dashboard, "1"));
        let view = node(&dashboard, Selector::class(VIEW_STOCK));
        dashboard.click(view);

        dashboard.click(node(&dashboard, Selector::id("deleteButton")));

        assert_eq!(dashboard.users().len(), 2);
        let doc = dashboard.document();
        assert_eq!(doc.query_all(&Selector::class(USER_ITEM)).len(), 2);
        assert!(doc.query(&Selector::class(PORTFOLIO_ROW)).is_none());
        let area = doc.query(&Selector::class(STOCK_AREA)).unwrap();
        assert_eq!(doc.text_content(area), "");
        assert_eq!(value_of(&dashboard, FIELD_USER_ID), "");
    }

    #[test]
    fn delete_without_selection_is_a_no_op() {
        let mut dashboard = Dashboard::boot(page::build(), three_users());

        dashboard.click(node(&dashboard, Selector::id("deleteButton")));

        assert_eq!(dashboard.users().len(), 3);
    }

    #[test]
    fn missing_containers_leave_features_inert() {
        let mut dashboard = Dashboard::boot(Document::new(), three_users());
        assert!(dashboard.listeners.is_empty());

        let root = dashboard.document().root();
        let stray = dashboard.document.append(root, Element::new("button"));
        assert!(dashboard.click(stray));
        assert_eq!(dashboard.users().len(), 3);
    }

    #[test]
    fn apply_resolves_selectors() {
        let mut dashboard = Dashboard::boot(page::build(), three_users());

        dashboard
            .apply(UiEvent::Click {
                target: Selector::class(USER_ITEM).and_attr("data-id", "2"),
            })
            .unwrap();
        dashboard
            .apply(UiEvent::Input {
                target: Selector::id(FIELD_FIRSTNAME),
                value: "Al".to_string(),
            })
            .unwrap();
        dashboard
            .apply(UiEvent::Click {
                target: Selector::id("saveButton"),
            })
            .unwrap();

        assert_eq!(dashboard.users()[1].user.firstname, "Al");
        assert_eq!(
            dashboard.apply(UiEvent::Click {
                target: Selector::id("nope"),
            }),
            Err(DashboardError::UnknownTarget("#nope".to_string()))
        );
    }

    #[test]
    fn ui_events_deserialize_by_type() {
        let event: UiEvent = serde_json::from_str(
            r#"{"type":"input","target":{"id":"city"},"value":"Paris"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            UiEvent::Input {
                target: Selector::id("city"),
                value: "Paris".to_string(),
            }
        );
    }
}
