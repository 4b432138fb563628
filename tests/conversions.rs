#![cfg(feature = "bundled_units")]

use unitcore::{
    convert::{ConvertError, ConvertUnit},
    unit::UnknownUnit,
    Registry,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

macro_rules! assert_close {
    ($a:expr, $b:expr) => {{
        let (a, b) = ($a, $b);
        assert!(close(a, b), "{a} != {b}");
    }};
}

#[test]
fn temperatures() {
    let registry = Registry::bundled();
    assert_eq!(
        registry.convert_absolute(0.0, "celsius", "kelvin").unwrap(),
        273.15
    );
    assert!(registry
        .convert_absolute(32.0, "fahrenheit", "celsius")
        .unwrap()
        .abs()
        < 1e-9);
    assert_close!(
        registry
            .convert_absolute(100.0, "celsius", "fahrenheit")
            .unwrap(),
        212.0
    );
    assert_close!(
        registry.convert_absolute(0.0, "rankine", "fahrenheit").unwrap(),
        -459.67
    );
    // a difference of temperatures has no offset
    assert_close!(registry.convert(10.0, "celsius", "fahrenheit").unwrap(), 18.0);
}

#[test]
fn exact_scales() {
    let registry = Registry::bundled();
    assert_eq!(registry.convert(1.0, "foot", "inch").unwrap(), 12.0);
    assert_eq!(registry.convert(1.0, "pound", "ounce").unwrap(), 16.0);
    assert_eq!(registry.convert(1.0, "turn", "degree").unwrap(), 360.0);
    assert_eq!(registry.convert(1.0, "hour", "second").unwrap(), 3600.0);
    assert_close!(registry.convert(1.0, "mile", "kilo-meter").unwrap(), 1.609344);
    assert_close!(registry.convert(1.0, "knot", "kilo-meter/hour").unwrap(), 1.852);
    assert_close!(registry.convert(1.0, "liter", "meter^3").unwrap(), 0.001);
    assert_close!(registry.convert(1.0, "gallon", "liter").unwrap(), 3.785411784);
    assert_close!(
        registry.convert(1.0, "kilo-watt*hour", "joule").unwrap(),
        3_600_000.0
    );
}

#[test]
fn angles_use_the_constant() {
    let registry = Registry::bundled();
    assert_close!(
        registry.convert(180.0, "degree", "radian").unwrap(),
        std::f64::consts::PI
    );
    assert_close!(registry.convert(1.0, "degree", "arcsecond").unwrap(), 3600.0);
    assert_close!(registry.convert(100.0, "gradian", "degree").unwrap(), 90.0);
}

#[test]
fn named_and_synthesized_units_mix() {
    let registry = Registry::bundled();
    assert_close!(registry.convert(1.0, "calorie", "newton*meter").unwrap(), 4.184);
    assert_close!(
        registry
            .convert(1.0, "kilo-gram*meter/second^2", "newton")
            .unwrap(),
        1.0
    );
    assert_close!(registry.convert(1.0, "bar", "kilo-pascal").unwrap(), 100.0);
    assert_close!(registry.convert(3.0, "hectare", "meter^2").unwrap(), 30_000.0);
}

#[test]
fn additive() {
    let registry = Registry::bundled();
    let height = registry
        .convert_additive(&[1.8], &["meter".into()], &["foot".into(), "inch".into()])
        .unwrap();
    assert_eq!(height[0], 5.0);
    assert!((height[1] - 10.866_141_732_283_5).abs() < 1e-9);

    let back = registry
        .convert_additive(
            &[5.0, 10.0],
            &["foot".into(), "inch".into()],
            &["meter".into()],
        )
        .unwrap();
    assert_close!(back[0], 1.778);

    let time = registry
        .convert_additive(
            &[100_000.0],
            &["second".into()],
            &["day".into(), "hour".into(), "minute".into(), "second".into()],
        )
        .unwrap();
    assert_eq!(time[..3], [1.0, 3.0, 46.0]);
    assert_close!(time[3], 40.0);
}

#[test]
fn additive_with_units() {
    let registry = Registry::bundled();
    let km = registry.parse_unit("kilo-meter").unwrap();
    let m = registry.find_unit("meter").unwrap();
    let from = [ConvertUnit::from("meter")];
    let to = [ConvertUnit::from(&km), ConvertUnit::from(&m)];
    assert_eq!(
        registry.convert_additive(&[1500.0], &from, &to).unwrap(),
        vec![1.0, 500.0]
    );
}

#[test]
fn errors() {
    let registry = Registry::bundled();
    assert_eq!(
        registry.convert(1.0, "meter", "second"),
        Err(ConvertError::MixedQuantities {
            from: "length".into(),
            to: "time".into()
        })
    );
    assert_eq!(
        registry.convert(1.0, "furlong", "meter"),
        Err(ConvertError::UnknownUnit(UnknownUnit("furlong".into())))
    );
    assert!(matches!(
        registry.convert_absolute(f64::NAN, "celsius", "kelvin"),
        Err(ConvertError::NonFinite(_))
    ));
    assert!(matches!(
        registry.convert_additive(&[1.0, 2.0], &["foot".into()], &["inch".into()]),
        Err(ConvertError::InputCount { units: 1, inputs: 2 })
    ));
    assert!(matches!(
        registry.convert_additive(&[1.0], &["foot".into()], &["inch".into(), "pound".into()]),
        Err(ConvertError::MixedQuantities { .. })
    ));
}

#[test]
fn recommended_units() {
    let registry = Registry::bundled();
    let length = registry.quantities().get("length").unwrap();
    let groups = registry.unit_groups(length);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].label, "main:unitsRecommended");
    let recommended: Vec<_> = groups[0].units.iter().map(|u| u.name()).collect();
    assert_eq!(
        recommended,
        ["meter", "kilo-meter", "centi-meter", "foot", "inch", "mile"]
    );
    assert_eq!(groups[1].label, "main:unitsRest");
    let rest: Vec<_> = groups[1].units.iter().map(|u| u.name()).collect();
    assert_eq!(rest, ["yard", "nauticalMile", "angstrom"]);

    let speed = registry.quantities().get("speed").unwrap();
    let symbols: Vec<_> = registry
        .default_units(speed)
        .unwrap()
        .iter()
        .map(|u| u.symbol())
        .collect();
    assert_eq!(symbols, ["km/h", "m/s", "kn"]);
}

#[test]
fn zero_points() {
    let registry = Registry::bundled();
    let celsius = registry.find_unit("celsius").unwrap();
    let kelvin = registry.find_unit("kelvin").unwrap();
    assert!(registry.has_zero_point(&celsius));
    assert!(!registry.has_zero_point(&kelvin));
    assert_eq!(registry.zero_points().get(&kelvin), 0.0);
}
