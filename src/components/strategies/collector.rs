use crate::components::component::{Component, ComponentVars};
use crate::components::context::AssemblyContext;
use crate::domain::{Coefficient, Commodity, IRRADIANCE};
use crate::error::ModelError;
use crate::model::{ModelBuilder, Sense};

/// Solar yield limited by irradiance (kW/m²) times collector area.
///
/// Uses the profile named after the component, else the shared irradiance
/// profile.
pub fn add_collector(
    component: &Component,
    vars: &ComponentVars,
    ctx: &AssemblyContext<'_>,
    builder: &mut ModelBuilder,
) -> Result<(), ModelError> {
    let name = &component.name;
    let efficiency = component.properties.require(name, Coefficient::Efficiency)?;
    let output = vars.output(name, Commodity::Heat)?;
    let area = vars.size(name)?;
    let irradiance = ctx.profiles.require_or(name, IRRADIANCE, builder.time_steps())?;

    for (t, &g) in irradiance.iter().enumerate() {
        builder.constrain(
            format!("collector_{name}[{t}]"),
            output.at(t),
            Sense::Le,
            (efficiency * g) * area,
        )?;
    }
    Ok(())
}
