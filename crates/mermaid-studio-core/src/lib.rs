//! Mermaid Studio Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Mermaid Studio
//! crates. It includes:
//!
//! - **Diagram registry**: Recognized diagram-type keywords and flowchart
//!   directions ([`diagram`] module)
//! - **View mode**: The editor/viewer mode of a session ([`view::ViewMode`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Points and sizes for pan/zoom and export ([`geometry`] module)

pub mod color;
pub mod diagram;
pub mod geometry;
pub mod view;
