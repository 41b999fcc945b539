use crate::components::component::{Component, ComponentVars};
use crate::components::context::AssemblyContext;
use crate::domain::Commodity;
use crate::error::ModelError;
use crate::model::{ModelBuilder, Sense};

/// Pin the consumed commodity to the component's demand profile.
///
/// The profile is looked up under the component name.
pub fn add_demand(
    component: &Component,
    commodity: Commodity,
    vars: &ComponentVars,
    ctx: &AssemblyContext<'_>,
    builder: &mut ModelBuilder,
) -> Result<(), ModelError> {
    let name = &component.name;
    let input = vars.input(name, commodity)?;
    let profile = ctx.profiles.require(name, builder.time_steps())?;

    for (t, &demand) in profile.iter().enumerate() {
        builder.constrain(format!("demand_{name}[{t}]"), input.at(t), Sense::Eq, demand)?;
    }
    Ok(())
}
