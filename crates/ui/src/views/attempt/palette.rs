use dioxus::prelude::*;

use crate::vm::PaletteEntryVm;

/// Question palette: one cell per question, colored by answer status.
#[component]
pub fn Palette(entries: Vec<PaletteEntryVm>, on_goto: EventHandler<usize>) -> Element {
    rsx! {
        nav { class: "palette",
            for entry in entries {
                button {
                    key: "{entry.index}",
                    class: if entry.current {
                        "palette-cell {entry.css_class} palette-current"
                    } else {
                        "palette-cell {entry.css_class}"
                    },
                    r#type: "button",
                    onclick: move |_| on_goto.call(entry.index),
                    "{entry.number}"
                }
            }
        }
    }
}
