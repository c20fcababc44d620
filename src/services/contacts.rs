//! Contact rows shared by members and non-members

use entity::contact;
use sea_orm::ActiveValue::Set;
use time::OffsetDateTime;

use crate::models::contact::{ContactChanges, NewContact};

pub(crate) fn new_contact(fields: &NewContact, now: OffsetDateTime) -> contact::ActiveModel {
    contact::ActiveModel {
        address: Set(fields.address.clone()),
        number: Set(fields.number.clone()),
        landline_number: Set(fields.landline_number.clone()),
        email: Set(fields.email.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// Applies the present fields of `changes`; returns `None` when nothing changed
pub(crate) fn apply_changes(
    model: contact::Model,
    changes: &ContactChanges,
    now: OffsetDateTime,
) -> Option<contact::ActiveModel> {
    if changes.address.is_none()
        && changes.number.is_none()
        && changes.landline_number.is_none()
        && changes.email.is_none()
    {
        return None;
    }

    let mut active: contact::ActiveModel = model.into();
    if let Some(address) = &changes.address {
        active.address = Set(address.clone());
    }
    if let Some(number) = &changes.number {
        active.number = Set(Some(number.clone()));
    }
    if let Some(landline_number) = &changes.landline_number {
        active.landline_number = Set(Some(landline_number.clone()));
    }
    if let Some(email) = &changes.email {
        active.email = Set(Some(email.clone()));
    }
    active.updated_at = Set(now);

    Some(active)
}
