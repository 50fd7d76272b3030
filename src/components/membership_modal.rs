use log::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, HtmlInputElement, Node};
use yew::prelude::*;

use crate::error::PageError;
use crate::membership::{Field, FieldErrors, MembershipForm, SubmitOutcome};

const TRIGGER_SELECTOR: &str = "a[href=\"#join-modal\"], .open-modal-btn";
const THANK_YOU: &str = "Thank you for your application! We will be in touch shortly.";

/// Opens the modal from any join link or button on the page.
pub struct ModalTriggers {
    document: Document,
    listener: Closure<dyn FnMut(MouseEvent)>,
}

impl ModalTriggers {
    pub fn init(open: Callback<()>) -> Result<Self, PageError> {
        let document = window()
            .and_then(|w| w.document())
            .ok_or(PageError::MissingElement("document"))?;

        let listener = Closure::wrap(Box::new(move |e: MouseEvent| {
            let trigger = e
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(TRIGGER_SELECTOR).ok().flatten());
            if trigger.is_some() {
                e.prevent_default();
                open.emit(());
            }
        }) as Box<dyn FnMut(MouseEvent)>);

        document.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
        Ok(Self { document, listener })
    }
}

impl Drop for ModalTriggers {
    fn drop(&mut self) {
        let _ = self
            .document
            .remove_event_listener_with_callback("click", self.listener.as_ref().unchecked_ref());
    }
}

/// Only a click landing on the dimmed overlay itself closes the modal, not
/// one on anything inside the dialog.
fn is_backdrop_click<N: PartialEq>(target: Option<&N>, overlay: Option<&N>) -> bool {
    matches!((target, overlay), (Some(target), Some(overlay)) if target == overlay)
}

#[derive(Debug, PartialEq)]
enum ModalStep {
    CloseWithThanks,
    /// The modal stays up with the form as typed.
    StayOpen(FieldErrors),
}

impl From<SubmitOutcome> for ModalStep {
    fn from(outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Accepted => ModalStep::CloseWithThanks,
            SubmitOutcome::Rejected(errors) => ModalStep::StayOpen(errors),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct MembershipModalProps {
    pub open: bool,
    pub on_close: Callback<()>,
}

#[function_component(MembershipModal)]
pub fn membership_modal(props: &MembershipModalProps) -> Html {
    let form = use_state(MembershipForm::default);
    let errors = use_state(FieldErrors::default);
    let overlay_ref = use_node_ref();

    let on_overlay_click = {
        let on_close = props.on_close.clone();
        let overlay_ref = overlay_ref.clone();
        Callback::from(move |e: MouseEvent| {
            let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
            if is_backdrop_click(target.as_ref(), overlay_ref.get().as_ref()) {
                on_close.emit(());
            }
        })
    };

    let on_close_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let on_submit = {
        let form = form.clone();
        let errors = errors.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let mut next = (*form).clone();
            match ModalStep::from(next.submit()) {
                ModalStep::CloseWithThanks => {
                    info!("Membership application accepted");
                    errors.set(FieldErrors::default());
                    form.set(next);
                    if let Some(window) = window() {
                        let _ = window.alert_with_message(THANK_YOU);
                    }
                    on_close.emit(());
                }
                ModalStep::StayOpen(field_errors) => {
                    warn!("Membership form has {} invalid field(s)", field_errors.count());
                    errors.set(field_errors);
                }
            }
        })
    };

    let field_group = |field: Field, id: &'static str, label: &'static str, kind: &'static str, value: &str| {
        let form = form.clone();
        let oninput = Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.set(field, input.value());
            form.set(next);
        });
        let error = errors.get(field);

        html! {
            <div class={classes!("form-group", error.is_some().then_some("error"))}>
                <label for={id}>{label}</label>
                <input type={kind} id={id} name={id} value={value.to_string()} {oninput} />
                <small class="error-message">{error.unwrap_or_default()}</small>
            </div>
        }
    };

    html! {
        <div
            id="join-modal"
            ref={overlay_ref}
            class={classes!("modal-overlay", props.open.then_some("active"))}
            onclick={on_overlay_click}
        >
            <div class="modal-content" role="dialog" aria-modal="true" aria-labelledby="join-modal-title">
                <button type="button" class="close-modal" aria-label="Close" onclick={on_close_click}>
                    {"×"}
                </button>
                <h2 id="join-modal-title">{"Become a Member"}</h2>
                <p>{"Fill in your details and our team will get back to you within a day."}</p>
                <form id="membership-form" novalidate=true onsubmit={on_submit}>
                    {field_group(Field::Name, "name", "Full Name", "text", &form.name)}
                    {field_group(Field::Email, "email", "Email Address", "email", &form.email)}
                    {field_group(Field::Phone, "phone", "Phone Number", "tel", &form.phone)}
                    <button type="submit" class="btn btn-primary">{"Submit Application"}</button>
                </form>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_overlay_itself_closes() {
        let (overlay, content, input) = ("overlay", "modal-content", "email");
        assert!(is_backdrop_click(Some(&overlay), Some(&overlay)));
        assert!(!is_backdrop_click(Some(&content), Some(&overlay)));
        assert!(!is_backdrop_click(Some(&input), Some(&overlay)));
    }

    #[test]
    fn unmounted_overlay_never_closes() {
        assert!(!is_backdrop_click(Some(&"overlay"), None));
        assert!(!is_backdrop_click::<&str>(None, None));
    }

    #[test]
    fn invalid_submit_keeps_modal_open_with_input() {
        let mut form = MembershipForm {
            name: "Jo".into(),
            email: "jo@x".into(),
            phone: String::new(),
        };
        match ModalStep::from(form.submit()) {
            ModalStep::StayOpen(errors) => {
                assert_eq!(errors.get(Field::Email), Some("Email is not valid"));
                assert_eq!(errors.get(Field::Phone), Some("Phone number is required"));
                assert_eq!(errors.get(Field::Name), None);
            }
            ModalStep::CloseWithThanks => panic!("invalid form closed the modal"),
        }
        assert_eq!(form.name, "Jo");
        assert_eq!(form.email, "jo@x");
    }

    #[test]
    fn valid_submit_closes_and_clears() {
        let mut form = MembershipForm {
            name: "Jo".into(),
            email: "jo@x.com".into(),
            phone: "555-0100".into(),
        };
        assert_eq!(ModalStep::from(form.submit()), ModalStep::CloseWithThanks);
        assert_eq!(form, MembershipForm::default());
    }
}
