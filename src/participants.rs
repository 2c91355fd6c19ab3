use crate::api::ApiClient;
use crate::dom::{Document, NodeId};
use crate::errors::ClientError;
use crate::models::ApiReply;
use tracing::{debug, info};

pub const MESSAGE_DISPLAY_ID: &str = "message-display";
pub const TABLE_BODY_ID: &str = "table-body";
pub const IDENTIFIER_FIELD_ID: &str = "participant_identif";
pub const ROLE_FIELD_ID: &str = "role";

pub const USERNAME_CELL: &str = "username-cell";
pub const ROLE_CELL: &str = "rol-cell";
pub const ACTIONS_CELL: &str = "actions-cell";
const ROLE_ID_ATTR: &str = "data-role-id";

/// In `Display` the role cell holds the role name and carries its id in
/// `data-role-id`. In `Editing` it holds a `<select>` whose `selected` option is
/// the role the row had when editing began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Display,
    Editing,
}

/// Handlers for one project's participant table.
pub struct ParticipantTable {
    api: ApiClient,
}

impl ParticipantTable {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Posts the add form. The fields are cleared before the request is sent
    /// and restored if the server refuses or the request fails.
    pub async fn add(&self, doc: &mut Document) -> Result<ApiReply, ClientError> {
        let identifier_field = doc.require_element(IDENTIFIER_FIELD_ID)?;
        let role_field = doc.require_element(ROLE_FIELD_ID)?;
        let identifier = doc.value(identifier_field).to_string();
        let role = doc.value(role_field).to_string();

        doc.set_value(identifier_field, "");
        doc.set_value(role_field, "");

        let reply = match self.api.add_participant(&identifier, &role).await {
            Ok(reply) => reply,
            Err(err) => {
                doc.set_value(identifier_field, &identifier);
                doc.set_value(role_field, &role);
                return Err(err);
            }
        };

        if reply.is_ok() {
            let role_name = option_text(doc, role_field, &role).unwrap_or_else(|| role.clone());
            let body = doc.require_element(TABLE_BODY_ID)?;
            let row = build_row(doc, &identifier, &role, &role_name);
            doc.append_child(body, row);
            info!(participant = %identifier, "participant added");
        } else {
            doc.set_value(identifier_field, &identifier);
            doc.set_value(role_field, &role);
        }

        show_banners(doc, &reply)?;
        Ok(reply)
    }

    /// Swaps the role text for a dropdown of the current role catalog.
    pub async fn edit(&self, doc: &mut Document, row: NodeId) -> Result<(), ClientError> {
        if row_state(doc, row)? == RowState::Editing {
            return Ok(());
        }
        let roles = self.api.project_roles().await?;
        let cell = role_cell(doc, row)?;
        let current_id = doc.attribute(cell, ROLE_ID_ATTR).unwrap_or("").to_string();
        let current_name = doc.text_content(cell);

        let select = doc.create_element("select");
        doc.set_attribute(select, "class", "form-select role-select");
        let mut has_current = false;
        for role in &roles {
            let id = role.id.to_string();
            let is_current = if current_id.is_empty() {
                role.name == current_name
            } else {
                id == current_id
            };
            let option = append_option(doc, select, &id, &role.name);
            if is_current && !has_current {
                doc.set_attribute(option, "selected", "");
                doc.set_value(select, &id);
                has_current = true;
            }
        }
        if !has_current {
            let option = append_option(doc, select, &current_id, &current_name);
            doc.set_attribute(option, "selected", "");
            doc.set_value(select, &current_id);
        }

        doc.set_text(cell, "");
        doc.append_child(cell, select);
        toggle_actions(doc, row)?;
        debug!(roles = roles.len(), "row switched to editing");
        Ok(())
    }

    /// Sends the chosen role. On success the cell shows it; otherwise the
    /// role the row had before editing is put back.
    pub async fn save(&self, doc: &mut Document, row: NodeId) -> Result<ApiReply, ClientError> {
        let cell = role_cell(doc, row)?;
        let select = doc
            .find_by_tag(cell, "select")
            .ok_or_else(|| ClientError::missing_element("role-select"))?;
        let username = username_of(doc, row)?;
        let chosen = doc.value(select).to_string();

        let reply = self.api.update_participant(&username, &chosen).await?;

        if reply.is_ok() {
            let name = option_text(doc, select, &chosen).unwrap_or_else(|| chosen.clone());
            show_role(doc, cell, &chosen, &name);
            info!(participant = %username, role = %chosen, "participant role updated");
        } else {
            restore_original(doc, cell, select);
        }

        show_banners(doc, &reply)?;
        toggle_actions(doc, row)?;
        Ok(reply)
    }

    /// Leaves editing without contacting the server.
    pub fn cancel(&self, doc: &mut Document, row: NodeId) -> Result<(), ClientError> {
        let cell = role_cell(doc, row)?;
        let Some(select) = doc.find_by_tag(cell, "select") else {
            return Ok(());
        };
        restore_original(doc, cell, select);
        toggle_actions(doc, row)
    }

    /// Removes the participant; the row leaves the table only once the server
    /// confirms with 200.
    pub async fn delete(&self, doc: &mut Document, row: NodeId) -> Result<ApiReply, ClientError> {
        let username = username_of(doc, row)?;
        let reply = self.api.remove_participant(&username).await?;

        if reply.is_ok() {
            doc.remove(row);
            info!(participant = %username, "participant removed");
        }

        show_banners(doc, &reply)?;
        Ok(reply)
    }
}

/// Builds a detached `<tr>` in display state.
pub fn build_row(doc: &mut Document, username: &str, role_id: &str, role_name: &str) -> NodeId {
    let row = doc.create_element("tr");

    let user = doc.append_new(row, "td", None);
    doc.set_attribute(user, "class", USERNAME_CELL);
    doc.set_text(user, username);

    let role = doc.append_new(row, "td", None);
    doc.set_attribute(role, "class", ROLE_CELL);
    show_role(doc, role, role_id, role_name);

    let actions = doc.append_new(row, "td", None);
    doc.set_attribute(actions, "class", ACTIONS_CELL);
    for (class, label, hidden) in [
        ("edit-btn", "Editar", false),
        ("delete-btn", "Eliminar", false),
        ("save-btn", "Guardar", true),
        ("cancel-btn", "Cancelar", true),
    ] {
        let button = doc.append_new(actions, "button", None);
        doc.set_attribute(button, "class", &format!("btn {class}"));
        if hidden {
            doc.set_attribute(button, "hidden", "");
        }
        doc.set_text(button, label);
    }

    row
}

/// Row of the table whose username cell reads `username`.
pub fn find_row(doc: &Document, username: &str) -> Option<NodeId> {
    let body = doc.get_element_by_id(TABLE_BODY_ID)?;
    doc.children(body).iter().copied().find(|row| {
        doc.find_by_class(*row, USERNAME_CELL)
            .is_some_and(|cell| doc.text_content(cell) == username)
    })
}

pub fn row_state(doc: &Document, row: NodeId) -> Result<RowState, ClientError> {
    let cell = role_cell(doc, row)?;
    Ok(match doc.find_by_tag(cell, "select") {
        Some(_) => RowState::Editing,
        None => RowState::Display,
    })
}

/// Moves the dropdown of an editing row to `role_id`, as a user would.
pub fn choose_role(doc: &mut Document, row: NodeId, role_id: &str) -> Result<(), ClientError> {
    let cell = role_cell(doc, row)?;
    let select = doc
        .find_by_tag(cell, "select")
        .ok_or_else(|| ClientError::missing_element("role-select"))?;
    if option_text(doc, select, role_id).is_none() {
        return Err(ClientError::missing_element(&format!("role option {role_id}")));
    }
    doc.set_value(select, role_id);
    Ok(())
}

/// Replaces the message area with one banner per reply message.
pub fn show_banners(doc: &mut Document, reply: &ApiReply) -> Result<Vec<NodeId>, ClientError> {
    let area = doc.require_element(MESSAGE_DISPLAY_ID)?;
    doc.clear_children(area);

    let style = if reply.is_ok() { "alert-success" } else { "alert-danger" };
    let mut banners = Vec::with_capacity(reply.messages.len());
    for message in &reply.messages {
        let banner = doc.append_new(area, "div", None);
        doc.set_attribute(banner, "class", &format!("alert {style} alert-dismissible fade show"));
        doc.set_attribute(banner, "role", "alert");
        doc.set_text(banner, message);

        let close = doc.append_new(banner, "button", None);
        doc.set_attribute(close, "type", "button");
        doc.set_attribute(close, "class", "btn-close");
        doc.set_attribute(close, "data-bs-dismiss", "alert");
        doc.set_attribute(close, "aria-label", "Close");
        banners.push(banner);
    }
    Ok(banners)
}

pub fn dismiss_banner(doc: &mut Document, banner: NodeId) {
    doc.remove(banner);
}

fn role_cell(doc: &Document, row: NodeId) -> Result<NodeId, ClientError> {
    doc.find_by_class(row, ROLE_CELL)
        .ok_or_else(|| ClientError::missing_element(ROLE_CELL))
}

fn username_of(doc: &Document, row: NodeId) -> Result<String, ClientError> {
    doc.find_by_class(row, USERNAME_CELL)
        .map(|cell| doc.text_content(cell))
        .ok_or_else(|| ClientError::missing_element(USERNAME_CELL))
}

fn show_role(doc: &mut Document, cell: NodeId, role_id: &str, role_name: &str) {
    doc.set_text(cell, role_name);
    doc.set_attribute(cell, ROLE_ID_ATTR, role_id);
}

fn restore_original(doc: &mut Document, cell: NodeId, select: NodeId) {
    let original = doc
        .children(select)
        .iter()
        .copied()
        .find(|option| doc.has_attribute(*option, "selected"));
    if let Some(option) = original {
        let id = doc.value(option).to_string();
        let name = doc.text_content(option);
        show_role(doc, cell, &id, &name);
    }
}

fn toggle_actions(doc: &mut Document, row: NodeId) -> Result<(), ClientError> {
    let actions = doc
        .find_by_class(row, ACTIONS_CELL)
        .ok_or_else(|| ClientError::missing_element(ACTIONS_CELL))?;
    let buttons: Vec<NodeId> = doc
        .children(actions)
        .iter()
        .copied()
        .filter(|node| doc.tag(*node) == "button")
        .collect();
    for button in buttons {
        doc.toggle_attribute(button, "hidden");
    }
    Ok(())
}

fn append_option(doc: &mut Document, select: NodeId, value: &str, label: &str) -> NodeId {
    let option = doc.append_new(select, "option", None);
    doc.set_value(option, value);
    doc.set_text(option, label);
    option
}

fn option_text(doc: &Document, select: NodeId, value: &str) -> Option<String> {
    doc.children(select)
        .iter()
        .find(|option| doc.tag(**option) == "option" && doc.value(**option) == value)
        .map(|option| doc.text_content(*option))
}
