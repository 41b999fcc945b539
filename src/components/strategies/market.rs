use crate::components::component::{Component, ComponentVars};
use crate::components::context::AssemblyContext;
use crate::domain::Commodity;
use crate::error::ModelError;
use crate::model::{LinExpr, ModelBuilder, Sense};

/// Purchase cost of a grid connection. A positive maximum size caps the
/// drawn power at every step.
pub fn add_supply(
    component: &Component,
    commodity: Commodity,
    vars: &ComponentVars,
    ctx: &AssemblyContext<'_>,
    builder: &mut ModelBuilder,
) -> Result<(), ModelError> {
    let name = &component.name;
    let output = vars.output(name, commodity)?;
    let price = component
        .properties
        .energy_price
        .or_else(|| ctx.economics.commodity_price(commodity))
        .ok_or_else(|| ModelError::MissingProperty {
            component: name.clone(),
            property: "energy_price",
        })?;

    if component.size.max > 0.0 {
        for t in 0..builder.time_steps() {
            builder.constrain(
                format!("supply_limit_{name}[{t}]"),
                output.at(t),
                Sense::Le,
                component.size.max,
            )?;
        }
    }

    let weight = price * ctx.economics.step_weight();
    builder.add_cost(output.iter().map(|v| weight * v).sum::<LinExpr>());
    Ok(())
}

/// Revenue of energy sold into a grid
pub fn add_feed_in(
    component: &Component,
    commodity: Commodity,
    vars: &ComponentVars,
    ctx: &AssemblyContext<'_>,
    builder: &mut ModelBuilder,
) -> Result<(), ModelError> {
    let name = &component.name;
    let input = vars.input(name, commodity)?;
    let price = component
        .properties
        .feed_in_price
        .unwrap_or(ctx.economics.feed_in_price);

    let weight = -price * ctx.economics.step_weight();
    builder.add_cost(input.iter().map(|v| weight * v).sum::<LinExpr>());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_utils::{component, Fixture};
    use crate::domain::ComponentProperties;

    #[test]
    fn test_grid_costs_and_revenue() {
        let grid = component("grid", "ElectricalGrid", ComponentProperties::default());
        let mut fixture = Fixture::new();
        fixture.economics.electricity_price = 0.3;
        fixture.economics.feed_in_price = 0.1;
        fixture.economics.step_hours = 0.5;

        let mut builder = ModelBuilder::new(2);
        let vars = grid.add_vars(&mut builder).unwrap();
        let ctx = fixture.context();
        add_supply(&grid, Commodity::Electricity, &vars, &ctx, &mut builder).unwrap();
        add_feed_in(&grid, Commodity::Electricity, &vars, &ctx, &mut builder).unwrap();
        let model = builder.finish();

        let bought = vars.output("grid", Commodity::Electricity).unwrap().at(1);
        let sold = vars.input("grid", Commodity::Electricity).unwrap().at(1);
        assert_eq!(model.objective().coefficient(bought), 0.15);
        assert_eq!(model.objective().coefficient(sold), -0.05);
        // size bounds of 0..100 from the fixture cap the connection
        assert!(model.constraint("supply_limit_grid[0]").is_some());
    }

    #[test]
    fn test_component_price_overrides_config() {
        let grid = component(
            "gas",
            "GasGrid",
            ComponentProperties {
                energy_price: Some(0.12),
                ..Default::default()
            },
        );
        let fixture = Fixture::new();
        let mut builder = ModelBuilder::new(1);
        let vars = grid.add_vars(&mut builder).unwrap();
        add_supply(&grid, Commodity::Gas, &vars, &fixture.context(), &mut builder).unwrap();

        let drawn = vars.output("gas", Commodity::Gas).unwrap().at(0);
        assert_eq!(builder.model().objective().coefficient(drawn), 0.12);
    }
}
