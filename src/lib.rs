//! `clockres-rs` packs a smartwatch watch face (a directory holding a
//! `config.json` layer descriptor and a set of layer images) into the single
//! `Clock*_res` container consumed by DT NO.1 / ATS3085-S class devices, and
//! unpacks such containers back into images and a descriptor.

pub use clockres_internal::*;
