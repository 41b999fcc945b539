use crate::components::component::{Component, ComponentVars};
use crate::components::context::AssemblyContext;
use crate::error::ModelError;
use crate::model::{ModelBuilder, Sense};

/// Energy balance of a storage.
///
/// `soc[t] = (1 - loss) * soc[t-1] + dt * (charge_eff * input[t] - output[t])`
/// where step 0 follows the last step, so the horizon repeats.
pub fn add_storage(
    component: &Component,
    vars: &ComponentVars,
    ctx: &AssemblyContext<'_>,
    builder: &mut ModelBuilder,
) -> Result<(), ModelError> {
    let name = &component.name;
    let Some(&commodity) = component.inputs().first() else {
        return Ok(());
    };
    let charge = vars.input(name, commodity)?;
    let discharge = vars.output(name, commodity)?;
    let state = vars.state.as_ref().ok_or_else(|| ModelError::MissingProperty {
        component: name.clone(),
        property: "state",
    })?;
    let size = vars.size(name)?;

    let retention = 1.0 - component.properties.loss_rate.unwrap_or(0.0);
    let charge_efficiency = component.properties.charge_efficiency.unwrap_or(1.0);
    let dt = ctx.economics.step_hours;
    let steps = builder.time_steps();

    for t in 0..steps {
        let previous = state.at((t + steps - 1) % steps);
        builder.constrain(
            format!("storage_balance_{name}[{t}]"),
            state.at(t),
            Sense::Eq,
            retention * previous + (dt * charge_efficiency) * charge.at(t) - dt * discharge.at(t),
        )?;
        builder.constrain(format!("storage_cap_{name}[{t}]"), state.at(t), Sense::Le, size)?;
    }
    Ok(())
}
