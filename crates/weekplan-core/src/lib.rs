//! Weekplan Core Types and Definitions
//!
//! This crate provides the value types shared by every stage of the weekplan
//! layout engine. It includes:
//!
//! - **Events**: The canonical calendar event model ([`event::Event`])
//! - **Time axis**: The shared half-hour slot grid ([`timeslot::TimeSlotGrid`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Draw**: Strokes and render layers for SVG output ([`draw`] module)
//! - **Style**: The per-source legend table ([`style::StyleTable`])

pub mod color;
pub mod draw;
pub mod event;
pub mod geometry;
pub mod style;
pub mod timeslot;
