//! Constraint strategies
//!
//! One function per capability. A component's template lists the
//! capabilities; [`apply`] dispatches each of them:
//! - conversion: efficiency relations and the size limit of converters
//! - storage: energy balance of storages
//! - demand: fixed consumption profiles
//! - market: purchase cost and feed-in revenue of grids
//! - collector: irradiance-limited solar yield
//! - investment: investment cost and build decision

pub mod collector;
pub mod conversion;
pub mod demand;
pub mod investment;
pub mod market;
pub mod storage;

use super::component::{Component, ComponentVars};
use super::context::AssemblyContext;
use super::registry::Capability;
use crate::error::ModelError;
use crate::model::ModelBuilder;

pub fn apply(
    capability: &Capability,
    component: &Component,
    vars: &ComponentVars,
    ctx: &AssemblyContext<'_>,
    builder: &mut ModelBuilder,
) -> Result<(), ModelError> {
    match capability {
        Capability::Conversion(rule) => conversion::add_conversion(component, rule, vars, builder),
        Capability::Capacity => conversion::add_capacity(component, vars, builder),
        Capability::Storage => storage::add_storage(component, vars, ctx, builder),
        Capability::Demand(commodity) => {
            demand::add_demand(component, *commodity, vars, ctx, builder)
        }
        Capability::Supply(commodity) => {
            market::add_supply(component, *commodity, vars, ctx, builder)
        }
        Capability::FeedIn(commodity) => {
            market::add_feed_in(component, *commodity, vars, ctx, builder)
        }
        Capability::Collector => collector::add_collector(component, vars, ctx, builder),
        Capability::Investment => investment::add_investment(component, vars, ctx, builder),
    }
}
