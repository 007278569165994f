#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use rk_mapper as mapper;
pub use rk_task as task;
