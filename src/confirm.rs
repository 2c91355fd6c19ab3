use crate::api::ApiClient;
use crate::dom::{Document, NodeId};
use crate::errors::ClientError;
use crate::resources::ResourceKind;
use axum::http::StatusCode;
use tracing::{info, warn};

pub const PASSWORD_FIELD_IDS: [&str; 2] = ["contrasena_1", "contrasena_2"];
pub const PASSWORD_CONTAINER_IDS: [&str; 2] = ["div_pass_1", "div_pass_2"];
pub const MISMATCH_FEEDBACK_ID: &str = "diff-pass";

const MISMATCH_FEEDBACK: &str = "Las contraseñas ingresadas son distintas.";
const MISMATCH_ALERT: &str = "¡Las contraseñas ingresadas difieren entre sí!";
const ACCOUNT_DELETED: &str = "Tu cuenta ha sido eliminada con exito";
const PROJECT_DELETED: &str = "El proyecto ha sido eliminado con exito";
const RETRY_LATER: &str = "No fue posible completar la eliminación. Vuelve a intentarlo más tarde.";

/// Browser dialogs and navigation, as seen by a deletion handler.
pub trait Dialogs {
    fn confirm(&mut self, message: &str) -> bool;
    fn prompt(&mut self, message: &str) -> Option<String>;
    fn alert(&mut self, message: &str);
    fn navigate(&mut self, location: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionTarget {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Declined,
    NameMismatch,
    PasswordMismatch,
    Deleted,
    Rejected(StatusCode),
}

pub fn confirm_message(name: &str) -> String {
    format!("¿Segurx quieres borrar {name}?\nPresiona OK para continuar...")
}

pub fn retype_message(name: &str) -> String {
    format!("Para eliminar {name} ingresa su nombre:")
}

/// Confirm, then retype the exact name; only then is the project deleted.
pub async fn delete_project<D: Dialogs>(
    api: &ApiClient,
    dialogs: &mut D,
    target: &DeletionTarget,
) -> Result<DeletionOutcome, ClientError> {
    if !dialogs.confirm(&confirm_message(&target.name)) {
        return Ok(DeletionOutcome::Declined);
    }
    match dialogs.prompt(&retype_message(&target.name)) {
        Some(typed) if typed == target.name => {}
        _ => return Ok(DeletionOutcome::NameMismatch),
    }

    let reply = api.delete_project(&target.id).await?;
    if !reply.is_ok() {
        warn!(project = %target.id, status = %reply.status, "project deletion refused");
        dialogs.alert(RETRY_LATER);
        return Ok(DeletionOutcome::Rejected(reply.status));
    }

    info!(project = %target.id, "project deleted");
    dialogs.alert(PROJECT_DELETED);
    let user = api.resources().require(ResourceKind::Usuario)?;
    dialogs.navigate(&format!("/usuario/{user}/proyecto"));
    Ok(DeletionOutcome::Deleted)
}

fn password_fields(doc: &Document) -> Result<[NodeId; 2], ClientError> {
    Ok([
        doc.require_element(PASSWORD_FIELD_IDS[0])?,
        doc.require_element(PASSWORD_FIELD_IDS[1])?,
    ])
}

pub fn passwords_match(doc: &Document) -> Result<bool, ClientError> {
    let [first, second] = password_fields(doc)?;
    Ok(doc.value(first) == doc.value(second))
}

/// Shows a mismatch note under both password fields while they differ.
/// Meant to run on every keystroke in either field.
pub fn refresh_password_feedback(doc: &mut Document) -> Result<bool, ClientError> {
    let containers = [
        doc.require_element(PASSWORD_CONTAINER_IDS[0])?,
        doc.require_element(PASSWORD_CONTAINER_IDS[1])?,
    ];
    for container in containers {
        if let Some(feedback) = doc.find_by_id(container, MISMATCH_FEEDBACK_ID) {
            doc.remove(feedback);
        }
    }

    let matching = passwords_match(doc)?;
    if !matching {
        for container in containers {
            let feedback = doc.append_new(container, "div", Some(MISMATCH_FEEDBACK_ID));
            doc.set_attribute(feedback, "class", "feedback");
            doc.set_text(feedback, MISMATCH_FEEDBACK);
        }
    }
    Ok(matching)
}

pub async fn delete_account<D: Dialogs>(
    api: &ApiClient,
    dialogs: &mut D,
    doc: &Document,
) -> Result<DeletionOutcome, ClientError> {
    if !passwords_match(doc)? {
        dialogs.alert(MISMATCH_ALERT);
        return Ok(DeletionOutcome::PasswordMismatch);
    }

    let [first, second] = password_fields(doc)?;
    let reply = api.delete_account(doc.value(first), doc.value(second)).await?;
    if !reply.is_ok() {
        warn!(status = %reply.status, "account deletion refused");
        for message in &reply.messages {
            dialogs.alert(message);
        }
        return Ok(DeletionOutcome::Rejected(reply.status));
    }

    dialogs.alert(ACCOUNT_DELETED);
    dialogs.navigate("/");
    Ok(DeletionOutcome::Deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password_doc(first: &str, second: &str) -> Document {
        let mut doc = Document::new();
        let body = doc.body();
        for (container_id, field_id, value) in [
            (PASSWORD_CONTAINER_IDS[0], PASSWORD_FIELD_IDS[0], first),
            (PASSWORD_CONTAINER_IDS[1], PASSWORD_FIELD_IDS[1], second),
        ] {
            let container = doc.append_new(body, "div", Some(container_id));
            let field = doc.append_new(container, "input", Some(field_id));
            doc.set_value(field, value);
        }
        doc
    }

    fn feedback_count(doc: &Document) -> usize {
        doc.descendants(doc.body())
            .into_iter()
            .filter(|node| doc.attribute(*node, "id") == Some(MISMATCH_FEEDBACK_ID))
            .count()
    }

    #[test]
    fn feedback_appears_once_per_field_while_passwords_differ() {
        let mut doc = password_doc("abc", "abd");
        assert!(!refresh_password_feedback(&mut doc).unwrap());
        assert!(!refresh_password_feedback(&mut doc).unwrap());
        assert_eq!(feedback_count(&doc), 2);

        let second = doc.get_element_by_id(PASSWORD_FIELD_IDS[1]).unwrap();
        doc.set_value(second, "abc");
        assert!(refresh_password_feedback(&mut doc).unwrap());
        assert_eq!(feedback_count(&doc), 0);
    }

    #[test]
    fn dialog_texts_interpolate_the_name() {
        assert!(confirm_message("Alfa").starts_with("¿Segurx quieres borrar Alfa?"));
        assert_eq!(retype_message("Alfa"), "Para eliminar Alfa ingresa su nombre:");
    }
}
