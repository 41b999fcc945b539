use crate::components::component::{Component, ComponentVars};
use crate::components::registry::ConversionRule;
use crate::error::ModelError;
use crate::model::{ModelBuilder, Sense};

/// Tie the outputs of a converter to its inputs
pub fn add_conversion(
    component: &Component,
    rule: &ConversionRule,
    vars: &ComponentVars,
    builder: &mut ModelBuilder,
) -> Result<(), ModelError> {
    let name = &component.name;
    match rule {
        ConversionRule::Linear { input, outputs } => {
            let fuel = vars.input(name, *input)?;
            for &(commodity, key) in outputs {
                let efficiency = component.properties.require(name, key)?;
                let output = vars.output(name, commodity)?;
                for t in 0..builder.time_steps() {
                    builder.constrain(
                        format!("conversion_{commodity}_{name}[{t}]"),
                        output.at(t),
                        Sense::Eq,
                        efficiency * fuel.at(t),
                    )?;
                }
            }
        }
        ConversionRule::Boost {
            base,
            booster,
            coefficient,
        } => {
            let efficiency = component.properties.require(name, *coefficient)?;
            let passthrough = vars.input(name, *base)?;
            let boost = vars.input(name, *booster)?;
            let output = vars.output(name, *base)?;
            for t in 0..builder.time_steps() {
                builder.constrain(
                    format!("conversion_{base}_{name}[{t}]"),
                    output.at(t),
                    Sense::Eq,
                    passthrough.at(t) + efficiency * boost.at(t),
                )?;
            }
        }
    }
    Ok(())
}

/// Bound the primary (first declared) output by the installed size
pub fn add_capacity(
    component: &Component,
    vars: &ComponentVars,
    builder: &mut ModelBuilder,
) -> Result<(), ModelError> {
    let name = &component.name;
    let Some(&primary) = component.outputs().first() else {
        return Ok(());
    };
    let output = vars.output(name, primary)?;
    let size = vars.size(name)?;
    for t in 0..builder.time_steps() {
        builder.constrain(format!("capacity_{name}[{t}]"), output.at(t), Sense::Le, size)?;
    }
    Ok(())
}
