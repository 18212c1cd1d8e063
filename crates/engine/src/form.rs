//! Form state: the draft being edited and the errors of the last submit.

use crate::{
    notice::{Notice, Notifier},
    validation::{FieldErrors, Schema},
};

pub struct FormController<S: Schema> {
    draft: S::Draft,
    errors: FieldErrors,
}

impl<S: Schema> FormController<S> {
    pub fn new(draft: S::Draft) -> Self {
        Self {
            draft,
            errors: FieldErrors::default(),
        }
    }

    pub fn draft(&self) -> &S::Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut S::Draft {
        &mut self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Validates the whole draft.
    ///
    /// On failure the error map is replaced and the schema's failure notice
    /// (if any) is raised. On success the errors are cleared and the
    /// normalized value is returned; the draft itself is left untouched.
    pub fn submit(&mut self, notifier: &mut dyn Notifier) -> Option<S::Output> {
        match S::validate(&self.draft) {
            Ok(value) => {
                self.errors = FieldErrors::default();
                Some(value)
            }
            Err(errors) => {
                self.errors = errors;
                if let Some(message) = S::FAILURE_NOTICE {
                    notifier.notify(Notice::error(message));
                }
                None
            }
        }
    }

    /// Drops the draft and any errors.
    pub fn reset(&mut self) {
        self.draft = S::Draft::default();
        self.errors = FieldErrors::default();
    }
}

impl<S: Schema> Default for FormController<S> {
    fn default() -> Self {
        Self::new(S::Draft::default())
    }
}
