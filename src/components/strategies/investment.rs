use tracing::warn;

use crate::components::component::{Component, ComponentVars};
use crate::components::context::AssemblyContext;
use crate::error::ModelError;
use crate::model::{ModelBuilder, Sense};

/// Investment cost of newly installed size, annualised into the objective.
///
/// `invest = specific_cost * (size - current_size) + fixed_cost * built`,
/// and with a fixed cost the size is only available once built.
pub fn add_investment(
    component: &Component,
    vars: &ComponentVars,
    ctx: &AssemblyContext<'_>,
    builder: &mut ModelBuilder,
) -> Result<(), ModelError> {
    let name = &component.name;
    let size = vars.size(name)?;
    let invest = vars.invest.ok_or_else(|| ModelError::MissingProperty {
        component: name.clone(),
        property: "invest",
    })?;

    let specific_cost = component.properties.specific_cost.unwrap_or_else(|| {
        warn!(component = %name, "no specific cost for component, investment is free");
        0.0
    });

    let mut cost = specific_cost * size - specific_cost * component.size.current;
    if let Some(built) = vars.built {
        let fixed_cost = component.properties.fixed_cost.unwrap_or(0.0);
        cost += fixed_cost * built;
        builder.constrain(
            format!("build_link_{name}"),
            size,
            Sense::Le,
            component.size.upper() * built,
        )?;
    }
    builder.constrain(format!("investment_{name}"), invest, Sense::Eq, cost)?;

    let lifetime = component
        .properties
        .lifetime_years
        .unwrap_or(ctx.economics.lifetime_years);
    builder.add_cost(ctx.economics.annuity_factor(lifetime) * invest);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_utils::{component, Fixture};
    use crate::domain::{ComponentProperties, SizeBounds};

    #[test]
    fn test_existing_size_is_not_paid_again() {
        let mut boiler = component(
            "b",
            "Boiler",
            ComponentProperties {
                specific_cost: Some(100.0),
                lifetime_years: Some(10),
                ..Default::default()
            },
        );
        boiler.size = SizeBounds::new(0.0, 40.0, 10.0);
        let fixture = Fixture::new();

        let mut builder = ModelBuilder::new(1);
        let vars = boiler.add_vars(&mut builder).unwrap();
        add_investment(&boiler, &vars, &fixture.context(), &mut builder).unwrap();
        let model = builder.finish();

        let c = model.constraint("investment_b").unwrap();
        assert_eq!(c.lhs.coefficient(vars.size.unwrap()), -100.0);
        assert_eq!(c.rhs, -1000.0);
        // zero interest: straight-line over the component lifetime
        assert_eq!(model.objective().coefficient(vars.invest.unwrap()), 0.1);
    }

    #[test]
    fn test_fixed_cost_links_size_to_build_decision() {
        let boiler = component(
            "b",
            "Boiler",
            ComponentProperties {
                specific_cost: Some(100.0),
                fixed_cost: Some(2000.0),
                ..Default::default()
            },
        );
        let fixture = Fixture::new();

        let mut builder = ModelBuilder::new(1);
        let vars = boiler.add_vars(&mut builder).unwrap();
        add_investment(&boiler, &vars, &fixture.context(), &mut builder).unwrap();
        let model = builder.finish();

        let built = vars.built.unwrap();
        let link = model.constraint("build_link_b").unwrap();
        assert_eq!(link.lhs.coefficient(built), -100.0);
        let invest = model.constraint("investment_b").unwrap();
        assert_eq!(invest.lhs.coefficient(built), -2000.0);
    }
}
