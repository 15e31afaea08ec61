use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::js_sys::{self, Array};
use web_sys::{
    Document, Element, Event, FormData, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlTextAreaElement,
};

use super::form::{ContactFields, ContactForm, ContactSurface};
use super::relay::Web3FormsRelay;
use super::status::StatusView;
use crate::config;
use crate::dom;

/// The contact form and the elements around it. Only the form itself is
/// required; a missing button or banner just disables that part.
pub struct ContactElements {
    form: HtmlFormElement,
    name: Option<Element>,
    email: Option<Element>,
    message: Option<Element>,
    submit: Option<HtmlButtonElement>,
    status: Option<HtmlElement>,
}

fn field_value(field: &Option<Element>) -> String {
    let Some(field) = field else {
        return String::new();
    };
    if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = field.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

impl ContactElements {
    pub fn find(document: &Document) -> Option<Self> {
        let form = document
            .get_element_by_id("contactForm")?
            .dyn_into::<HtmlFormElement>()
            .ok()?;
        let submit = form
            .query_selector("button[type=\"submit\"]")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
        Some(Self {
            name: document.get_element_by_id("name"),
            email: document.get_element_by_id("email"),
            message: document.get_element_by_id("message"),
            submit,
            status: dom::html_by_id(document, "formStatus"),
            form,
        })
    }
}

impl ContactSurface for ContactElements {
    fn fields(&self) -> ContactFields {
        ContactFields {
            name: field_value(&self.name),
            email: field_value(&self.email),
            message: field_value(&self.message),
        }
    }

    fn entries(&self) -> Vec<(String, String)> {
        let Ok(data) = FormData::new_with_form(&self.form) else {
            return Vec::new();
        };
        let Ok(Some(iter)) = js_sys::try_iter(&data) else {
            return Vec::new();
        };
        iter.filter_map(Result::ok)
            .filter_map(|pair| {
                let pair: Array = pair.dyn_into().ok()?;
                // file inputs yield Blob values and are skipped
                Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
            })
            .collect()
    }

    fn submit_label(&self) -> Option<String> {
        self.submit
            .as_ref()
            .map(|button| button.text_content().unwrap_or_default())
    }

    fn set_submit(&self, label: &str, disabled: bool) {
        if let Some(button) = &self.submit {
            button.set_text_content(Some(label));
            button.set_disabled(disabled);
        }
    }

    fn render_status(&self, view: &StatusView) {
        let Some(status) = &self.status else {
            return;
        };
        status.set_text_content(Some(&view.text));
        status.set_class_name(&view.class_name());
        let display = if view.visible { "block" } else { "none" };
        let _ = status.style().set_property("display", display);
    }

    fn reset(&self) {
        self.form.reset();
    }
}

pub fn install(document: &Document) {
    let Some(elements) = ContactElements::find(document) else {
        log::debug!("no contact form on page");
        return;
    };
    let target = elements.form.clone();
    let contact = Rc::new(ContactForm::new(
        elements,
        Web3FormsRelay::new(config::get_form_relay_url()),
        config::get_access_key(),
    ));

    dom::listen(&target, "submit", move |e: Event| {
        e.prevent_default();
        let contact = contact.clone();
        spawn_local(async move {
            let report = contact.submit().await;
            log::debug!("contact form is {:?}", contact.phase());
            if let Some(hide) = report.auto_hide {
                Timeout::new(hide.after_ms, move || contact.expire_status(hide.generation)).forget();
            }
        });
    });
}
