//! Raw bindgen bindings to libgphoto2.

#![allow(non_upper_case_globals, non_camel_case_types, non_snake_case, clippy::all)]
#![allow(rustdoc::broken_intra_doc_links, rustdoc::invalid_html_tags)]

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
