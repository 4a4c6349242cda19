//! Entity form - two-mode modal with a copy-on-open draft
//!
//! The draft is seeded when the modal opens (blank template for create, a
//! clone of the record for edit) and discarded on close or successful
//! submit; it never aliases the controller's row list, so a half-edited
//! record can never leak into the table. Deletion goes through an explicit
//! yes/no prompt before any request exists.

use crate::domain::entity::{EntityDraft, EntityRecord};
use crate::infrastructure::api::ApiError;
use crate::infrastructure::runtime::MutationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

impl FormMode {
    pub fn title(&self) -> &'static str {
        match self {
            FormMode::Create => "Add Module",
            FormMode::Edit => "Edit Module",
        }
    }
}

/// Field currently focused in the modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Code,
    Description,
    Active,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Code,
        FormField::Description,
        FormField::Active,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Code => "Module Code",
            FormField::Description => "Description",
            FormField::Active => "Active",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Code,
            FormField::Code => FormField::Description,
            FormField::Description => FormField::Active,
            FormField::Active => FormField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Active,
            FormField::Code => FormField::Name,
            FormField::Description => FormField::Code,
            FormField::Active => FormField::Description,
        }
    }
}

/// Modal lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Closed,
    Editing,
    /// Delete asked for; waiting on the yes/no prompt
    ConfirmingDelete,
    /// A request is in flight; inputs are disabled
    Submitting,
}

/// What the form asks the runtime to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormRequest {
    Create { draft: EntityDraft },
    Update { id: String, draft: EntityDraft },
    Delete { id: String },
}

pub struct EntityForm {
    state: FormState,
    mode: FormMode,
    draft: EntityDraft,
    focus: FormField,
    error: Option<ApiError>,
}

impl EntityForm {
    pub fn new() -> Self {
        Self {
            state: FormState::Closed,
            mode: FormMode::Create,
            draft: EntityDraft::blank(),
            focus: FormField::Name,
            error: None,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &EntityDraft {
        &self.draft
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.state != FormState::Closed
    }

    pub fn open_create(&mut self) {
        self.state = FormState::Editing;
        self.mode = FormMode::Create;
        self.draft = EntityDraft::blank();
        self.focus = FormField::Name;
        self.error = None;
    }

    pub fn open_edit(&mut self, record: &EntityRecord) {
        self.state = FormState::Editing;
        self.mode = FormMode::Edit;
        self.draft = EntityDraft::from_record(record);
        self.focus = FormField::Name;
        self.error = None;
    }

    /// Close and discard the draft
    pub fn close(&mut self) {
        self.state = FormState::Closed;
        self.draft = EntityDraft::blank();
        self.error = None;
    }

    pub fn focus_next(&mut self) {
        if self.state == FormState::Editing {
            self.focus = self.focus.next();
        }
    }

    pub fn focus_prev(&mut self) {
        if self.state == FormState::Editing {
            self.focus = self.focus.prev();
        }
    }

    /// Type into the focused field
    pub fn input(&mut self, ch: char) {
        if self.state != FormState::Editing {
            return;
        }
        match self.focus {
            FormField::Name => self.draft.name.push(ch),
            FormField::Code => self.draft.code.push(ch),
            FormField::Description => self.draft.description.push(ch),
            FormField::Active => {}
        }
    }

    pub fn backspace(&mut self) {
        if self.state != FormState::Editing {
            return;
        }
        match self.focus {
            FormField::Name => {
                self.draft.name.pop();
            }
            FormField::Code => {
                self.draft.code.pop();
            }
            FormField::Description => {
                self.draft.description.pop();
            }
            FormField::Active => {}
        }
    }

    pub fn toggle_active(&mut self) {
        if self.state == FormState::Editing {
            self.draft.active = !self.draft.active;
        }
    }

    /// Validate required fields and produce the mutation request.
    ///
    /// Only name and code are enforced locally; every business rule stays
    /// on the server and comes back through the error channel.
    pub fn submit(&mut self) -> Result<FormRequest, ApiError> {
        if self.state != FormState::Editing {
            return Err(ApiError::Rejected {
                status: None,
                message: "form is not open".to_string(),
            });
        }
        if self.draft.name.trim().is_empty() {
            let error = ApiError::Validation("name");
            self.error = Some(error.clone());
            return Err(error);
        }
        if self.draft.code.trim().is_empty() {
            let error = ApiError::Validation("module code");
            self.error = Some(error.clone());
            return Err(error);
        }

        self.state = FormState::Submitting;
        self.error = None;
        Ok(match self.draft.id.clone() {
            Some(id) => FormRequest::Update {
                id,
                draft: self.draft.clone(),
            },
            None => FormRequest::Create {
                draft: self.draft.clone(),
            },
        })
    }

    /// Ask for delete confirmation; nothing is sent yet
    pub fn request_delete(&mut self) -> bool {
        if self.state != FormState::Editing || self.draft.id.is_none() {
            return false;
        }
        self.state = FormState::ConfirmingDelete;
        true
    }

    /// Explicit confirmation produces the delete request
    pub fn confirm_delete(&mut self) -> Option<FormRequest> {
        if self.state != FormState::ConfirmingDelete {
            return None;
        }
        let id = self.draft.id.clone()?;
        self.state = FormState::Submitting;
        Some(FormRequest::Delete { id })
    }

    /// Decline the prompt; back to editing, nothing was sent
    pub fn decline_delete(&mut self) {
        if self.state == FormState::ConfirmingDelete {
            self.state = FormState::Editing;
        }
    }

    /// Apply a worker result: success closes the modal, failure re-opens
    /// editing with the error surfaced. Returns true when the modal was
    /// still submitting and the result closed it.
    pub fn apply_result(&mut self, _kind: MutationKind, result: Result<(), ApiError>) -> bool {
        if self.state != FormState::Submitting {
            return false;
        }
        match result {
            Ok(()) => {
                self.close();
                true
            }
            Err(error) => {
                self.state = FormState::Editing;
                self.error = Some(error);
                false
            }
        }
    }
}

impl Default for EntityForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EntityRecord {
        EntityRecord {
            id: "sec-1".to_string(),
            code: "M1".to_string(),
            name: "Mod One".to_string(),
            description: "first".to_string(),
            active: false,
        }
    }

    #[test]
    fn create_mode_starts_from_the_blank_template() {
        let mut form = EntityForm::new();
        form.open_create();
        assert_eq!(form.mode(), FormMode::Create);
        assert!(form.draft().active);
        assert!(form.draft().id.is_none());
    }

    #[test]
    fn edit_mode_copies_the_record_without_aliasing() {
        let mut form = EntityForm::new();
        let original = record();
        form.open_edit(&original);

        form.input('!');
        assert_eq!(form.draft().name, "Mod One!");
        // the source record is untouched
        assert_eq!(original.name, "Mod One");
    }

    #[test]
    fn submit_validates_required_fields_locally() {
        let mut form = EntityForm::new();
        form.open_create();
        assert_eq!(form.submit(), Err(ApiError::Validation("name")));
        assert_eq!(form.state(), FormState::Editing);

        for ch in "Mod One".chars() {
            form.input(ch);
        }
        assert_eq!(form.submit(), Err(ApiError::Validation("module code")));

        form.focus_next(); // code
        for ch in "M1".chars() {
            form.input(ch);
        }
        let request = form.submit().unwrap();
        match request {
            FormRequest::Create { draft } => {
                assert_eq!(draft.name, "Mod One");
                assert_eq!(draft.code, "M1");
            }
            other => panic!("expected create, got {other:?}"),
        }
        assert_eq!(form.state(), FormState::Submitting);
    }

    #[test]
    fn edit_submit_produces_an_update_for_the_record_id() {
        let mut form = EntityForm::new();
        form.open_edit(&record());
        match form.submit().unwrap() {
            FormRequest::Update { id, .. } => assert_eq!(id, "sec-1"),
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn delete_needs_explicit_confirmation() {
        let mut form = EntityForm::new();
        form.open_edit(&record());

        assert!(form.request_delete());
        assert_eq!(form.state(), FormState::ConfirmingDelete);

        // declining sends nothing and returns to editing
        form.decline_delete();
        assert_eq!(form.state(), FormState::Editing);
        assert!(form.confirm_delete().is_none());

        // confirming produces exactly one delete request
        assert!(form.request_delete());
        assert_eq!(
            form.confirm_delete(),
            Some(FormRequest::Delete {
                id: "sec-1".to_string()
            })
        );
        assert_eq!(form.state(), FormState::Submitting);
    }

    #[test]
    fn unsaved_records_cannot_be_deleted() {
        let mut form = EntityForm::new();
        form.open_create();
        assert!(!form.request_delete());
        assert_eq!(form.state(), FormState::Editing);
    }

    #[test]
    fn success_closes_and_requests_a_refresh() {
        let mut form = EntityForm::new();
        form.open_edit(&record());
        form.submit().unwrap();

        assert!(form.apply_result(MutationKind::Update, Ok(())));
        assert!(!form.is_open());
    }

    #[test]
    fn failure_keeps_the_modal_open_with_the_error() {
        let mut form = EntityForm::new();
        form.open_edit(&record());
        form.submit().unwrap();

        let closed = form.apply_result(
            MutationKind::Update,
            Err(ApiError::Rejected {
                status: Some(400),
                message: "code already exists".to_string(),
            }),
        );
        assert!(!closed);
        assert!(form.is_open());
        assert_eq!(
            form.error().map(ToString::to_string).as_deref(),
            Some("code already exists")
        );
    }
}
