// Small DOM-facing helpers shared across components.

use web_sys::{Element, TouchList};

use crate::state::{ContactPoint, ViewportRect};

pub fn clog(msg: &str) {
    web_sys::console::log_1(&msg.into());
}

/// Snapshot of the active touches as plain contact points.
pub fn touches_to_contacts(list: &TouchList) -> Vec<ContactPoint> {
    let mut contacts = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(touch) = list.item(i) {
            contacts.push(ContactPoint::new(
                touch.identifier(),
                f64::from(touch.client_x()),
                f64::from(touch.client_y()),
            ));
        }
    }
    contacts
}

/// Current bounding rect of an element, in viewport-space pixels.
pub fn element_rect(el: &Element) -> ViewportRect {
    let rect = el.get_bounding_client_rect();
    ViewportRect::new(rect.left(), rect.top(), rect.width(), rect.height())
}
