//! Sample drafts for trying the upload flow without typing every field.

use contracts::usecases::u508_bulk_product_create::catalog::{
    sub_categories, AGE_YEARS_RANGE, BREEDER_OPTIONS, CM_PER_INCH, MAIN_CATEGORIES,
    PRICE_CENTS_RANGE, SEX_OPTIONS, SIZE_CM_RANGE,
};
use contracts::usecases::u508_bulk_product_create::ProductFields;
use rand::seq::SliceRandom;
use rand::Rng;

const DESCRIPTION_OPENERS: &[&str] = &[
    "Strong body with a clean white base.",
    "Bright, even colour and a well balanced pattern.",
    "Good skin quality and promising growth.",
    "Elegant swimmer with sharp pattern edges.",
];

fn pick<'a, R: Rng + ?Sized>(options: &[&'a str], rng: &mut R) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

/// Random but valid field values: the sub-category always belongs to
/// the chosen main category and numbers stay inside the catalogue ranges.
pub fn sample_fields<R: Rng + ?Sized>(rng: &mut R) -> ProductFields {
    let main_category = pick(MAIN_CATEGORIES, rng);
    let sub_category = pick(sub_categories(main_category), rng);
    let breeder = pick(BREEDER_OPTIONS, rng);

    let price_cents = rng.gen_range(PRICE_CENTS_RANGE.0..=PRICE_CENTS_RANGE.1);
    let age = rng.gen_range(AGE_YEARS_RANGE.0..=AGE_YEARS_RANGE.1);
    let size_cm = rng.gen_range(SIZE_CM_RANGE.0..=SIZE_CM_RANGE.1);
    let size_in = f64::from(size_cm) / CM_PER_INCH;

    ProductFields {
        title: format!("{breeder} {sub_category} {size_cm}cm"),
        description: format!(
            "{} {age} year old {main_category} from {breeder}.",
            pick(DESCRIPTION_OPENERS, rng)
        ),
        price: format!("{}.{:02}", price_cents / 100, price_cents % 100),
        main_category: main_category.to_string(),
        sub_category: sub_category.to_string(),
        breeder: breeder.to_string(),
        sex: pick(SEX_OPTIONS, rng).to_string(),
        age: age.to_string(),
        size_cm: size_cm.to_string(),
        size_in: format!("{size_in:.1}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::usecases::u508_bulk_product_create::validate;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_fields_are_valid() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..200 {
            let fields = sample_fields(&mut rng);
            assert_eq!(validate(&fields), Ok(()), "{fields:?}");
            assert!(sub_categories(&fields.main_category).contains(&fields.sub_category.as_str()));
            assert!(SEX_OPTIONS.contains(&fields.sex.as_str()));

            let age: u32 = fields.age.parse().unwrap();
            assert!((AGE_YEARS_RANGE.0..=AGE_YEARS_RANGE.1).contains(&age));
            let size: u32 = fields.size_cm.parse().unwrap();
            assert!((SIZE_CM_RANGE.0..=SIZE_CM_RANGE.1).contains(&size));
            let price: f64 = fields.price.parse().unwrap();
            assert!((50.0..=5000.0).contains(&price));
        }
    }

    #[test]
    fn test_inches_follow_centimetres() {
        let mut rng = SmallRng::seed_from_u64(1);
        let fields = sample_fields(&mut rng);
        let cm: f64 = fields.size_cm.parse().unwrap();
        let inches: f64 = fields.size_in.parse().unwrap();
        assert!((cm / CM_PER_INCH - inches).abs() < 0.051);
    }

    #[test]
    fn test_same_seed_same_output() {
        let a = sample_fields(&mut SmallRng::seed_from_u64(9));
        let b = sample_fields(&mut SmallRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
