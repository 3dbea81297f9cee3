//! Conversion of form descriptions into `reqwest` multipart bodies.
//!
//! A [`Form`] cannot be cloned, so one is built per attempt from the owned
//! description; file contents are shared `Bytes` and are not copied.

use reqwest::multipart::{Form, Part};

use super::ClientError;
use crate::objects::FilePart;
use crate::objects::complete_order::{
    CompleteOrderForm, FIELD_BOOKING_DETAILS, FIELD_IMAGES, FIELD_ORDER_ID, FIELD_PAYMENT_ID,
    FIELD_RECORDINGS, FIELD_SIGNATURE,
};
use crate::objects::update::{
    FIELD_DESCRIPTION, FIELD_ORDER_ID as UPDATE_FIELD_ORDER_ID, FIELD_VOICE_MESSAGES, UpdateForm,
};

fn file_part(file: &FilePart) -> Result<Part, ClientError> {
    let len = file.content.len() as u64;
    let part = Part::stream_with_length(reqwest::Body::from(file.content.clone()), len)
        .file_name(file.file_name.clone())
        .mime_str(&file.mime)?;
    Ok(part)
}

impl CompleteOrderForm {
    pub(super) fn to_multipart(&self) -> Result<Form, ClientError> {
        let details = serde_json::to_string(&self.booking_details)?;
        let mut form = Form::new()
            .text(FIELD_PAYMENT_ID, self.payment_id.clone())
            .text(FIELD_ORDER_ID, self.order_id.clone())
            .text(FIELD_SIGNATURE, self.signature.clone());

        for image in &self.images {
            form = form.part(FIELD_IMAGES, file_part(image)?);
        }
        for recording in &self.recordings {
            form = form.part(FIELD_RECORDINGS, file_part(recording)?);
        }

        Ok(form.text(FIELD_BOOKING_DETAILS, details))
    }
}

impl UpdateForm {
    pub(super) fn to_multipart(&self) -> Result<Form, ClientError> {
        let mut form = Form::new()
            .text(UPDATE_FIELD_ORDER_ID, self.order_id.clone())
            .text(FIELD_DESCRIPTION, self.description.clone());
        for note in &self.voice_messages {
            form = form.part(FIELD_VOICE_MESSAGES, file_part(note)?);
        }
        Ok(form)
    }
}
