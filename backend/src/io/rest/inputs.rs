//! # Endpoint Inputs
//!
//! Serde structs that the [`Validated`](super::validated::Validated)
//! extractor binds each request into, with their declared rules and the
//! query or command each one yields once it is valid.
//!
//! Every field is optional at the binding stage. Presence is a rule like any
//! other, so a missing `firstName` is reported next to a too-long
//! `lastName` instead of aborting binding.

use serde::Deserialize;

use super::binding::coerce;
use super::validated::BoundInput;
use crate::domain::commands::contacts::{
    CreateContactCommand, DeleteContactCommand, ListContactsQuery, ReadContactQuery,
    UpdateContactCommand,
};
use crate::domain::commands::Page;
use crate::domain::models::contact::{EMAIL_MAX_CHARS, NAME_MAX_CHARS};
use crate::domain::value_change::ValueChange;
use crate::validation::{field, ErrorCollection, Validate};

pub const DEFAULT_PAGE_NUMBER: u32 = 1;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Field key for rules that concern the body as a whole.
pub const BODY_FIELD: &str = "";

#[derive(Debug, Default, Deserialize)]
struct PageParams {
    #[serde(default, deserialize_with = "coerce::optional_i64")]
    number: Option<i64>,
    #[serde(default, deserialize_with = "coerce::optional_i64")]
    size: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct FilterParams {
    #[serde(default)]
    id: Option<String>,
}

/// `page[number]`, `page[size]` and `filter[id]` of a listing endpoint.
///
/// `DEFAULT_SIZE` is the page size used when `page[size]` is omitted.
#[derive(Debug, Deserialize)]
pub struct PageInput<const DEFAULT_SIZE: u32> {
    #[serde(default)]
    page: PageParams,
    #[serde(default)]
    filter: FilterParams,
}

/// `GET /api/contacts`
pub type ListContactsInput = PageInput<20>;

/// `GET /api/contacts/deleted`
pub type ListDeletedContactsInput = PageInput<10>;

impl<const DEFAULT_SIZE: u32> Validate for PageInput<DEFAULT_SIZE> {
    fn validate(&self, errors: &mut ErrorCollection) {
        if let Some(number) = self.page.number {
            field(errors, "page[number]").at_least(number, 1);
        }

        if let Some(size) = self.page.size {
            field(errors, "page[size]")
                .at_least(size, 1)
                .at_most(size, i64::from(MAX_PAGE_SIZE));
        }

        if let Some(id) = &self.filter.id {
            field(errors, "filter[id]").not_blank(id);
        }
    }
}

impl<const DEFAULT_SIZE: u32> BoundInput for PageInput<DEFAULT_SIZE> {
    type Output = ListContactsQuery;

    fn into_output(self) -> ListContactsQuery {
        let number = self
            .page
            .number
            .map_or(DEFAULT_PAGE_NUMBER, |n| u32::try_from(n).unwrap_or(u32::MAX));
        let size = self
            .page
            .size
            .map_or(DEFAULT_SIZE, |s| u32::try_from(s).unwrap_or(MAX_PAGE_SIZE));

        ListContactsQuery {
            resource_id: self.filter.id,
            page: Page::new(number, size),
        }
    }
}

fn validate_id(id: Option<&String>, errors: &mut ErrorCollection) {
    let check = field(errors, "id").required(id);
    if let Some(id) = id {
        check.not_blank(id);
    }
}

/// `GET /api/contacts/:id`
#[derive(Debug, Deserialize)]
pub struct ReadContactInput {
    #[serde(default)]
    id: Option<String>,
}

impl Validate for ReadContactInput {
    fn validate(&self, errors: &mut ErrorCollection) {
        validate_id(self.id.as_ref(), errors);
    }
}

impl BoundInput for ReadContactInput {
    type Output = ReadContactQuery;

    fn into_output(self) -> ReadContactQuery {
        ReadContactQuery {
            id: self.id.unwrap_or_default(),
        }
    }
}

/// `DELETE /api/contacts/:id`
#[derive(Debug, Deserialize)]
pub struct DeleteContactInput {
    #[serde(default)]
    id: Option<String>,
}

impl Validate for DeleteContactInput {
    fn validate(&self, errors: &mut ErrorCollection) {
        validate_id(self.id.as_ref(), errors);
    }
}

impl BoundInput for DeleteContactInput {
    type Output = DeleteContactCommand;

    fn into_output(self) -> DeleteContactCommand {
        DeleteContactCommand {
            id: self.id.unwrap_or_default(),
        }
    }
}

/// `POST /api/contacts`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactInput {
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl Validate for CreateContactInput {
    fn validate(&self, errors: &mut ErrorCollection) {
        let check = field(errors, "firstName").required(self.first_name.as_ref());
        if let Some(first_name) = &self.first_name {
            check
                .not_blank(first_name)
                .max_chars(first_name, NAME_MAX_CHARS);
        }

        if let Some(last_name) = &self.last_name {
            field(errors, "lastName").max_chars(last_name, NAME_MAX_CHARS);
        }

        let check = field(errors, "email").required(self.email.as_ref());
        if let Some(email) = &self.email {
            check.max_chars(email, EMAIL_MAX_CHARS).email(email);
        }
    }
}

impl BoundInput for CreateContactInput {
    type Output = CreateContactCommand;

    fn into_output(self) -> CreateContactCommand {
        CreateContactCommand {
            first_name: self.first_name.unwrap_or_default().trim().to_string(),
            last_name: self.last_name.map(|name| name.trim().to_string()),
            email: self.email.unwrap_or_default().trim().to_string(),
        }
    }
}

/// `PATCH /api/contacts/:id`
///
/// Each attribute records whether it was sent at all. `lastName: null`
/// clears the stored value; `firstName` and `email` cannot be null.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactInput {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    first_name: ValueChange<Option<String>>,
    #[serde(default)]
    last_name: ValueChange<Option<String>>,
    #[serde(default)]
    email: ValueChange<Option<String>>,
}

impl Validate for UpdateContactInput {
    fn validate(&self, errors: &mut ErrorCollection) {
        validate_id(self.id.as_ref(), errors);

        if let Some(first_name) = self.first_name.as_present() {
            let check = field(errors, "firstName").not_null(first_name.as_ref());
            if let Some(first_name) = first_name {
                check
                    .not_blank(first_name)
                    .max_chars(first_name, NAME_MAX_CHARS);
            }
        }

        if let Some(Some(last_name)) = self.last_name.as_present() {
            field(errors, "lastName").max_chars(last_name, NAME_MAX_CHARS);
        }

        if let Some(email) = self.email.as_present() {
            let check = field(errors, "email").not_null(email.as_ref());
            if let Some(email) = email {
                check.max_chars(email, EMAIL_MAX_CHARS).email(email);
            }
        }

        let changes_something = self.first_name.is_present()
            || self.last_name.is_present()
            || self.email.is_present();
        if !changes_something {
            errors.add(
                BODY_FIELD,
                "request body must contain at least one of firstName, lastName, email",
            );
        }
    }
}

impl BoundInput for UpdateContactInput {
    type Output = UpdateContactCommand;

    fn into_output(self) -> UpdateContactCommand {
        let trimmed = |value: String| value.trim().to_string();

        UpdateContactCommand {
            id: self.id.unwrap_or_default(),
            first_name: self.first_name.into_required().map(trimmed),
            last_name: self.last_name.map(|name| name.map(trimmed)),
            email: self.email.into_required().map(trimmed),
        }
    }
}
