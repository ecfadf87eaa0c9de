//! Integration tests for the bundled seed file.
//!
//! The preview validates the file and prices every order line from its
//! product without touching a database.

use northwind_admin::seed::{SeedError, SeedFile};
use northwind_integration_tests::sample_seed_path;

#[tokio::test]
async fn test_sample_seed_file_previews() {
    let file = SeedFile::from_path(&sample_seed_path())
        .await
        .expect("sample seed file parses");

    let previews = file.preview().expect("sample seed file is valid");
    assert_eq!(previews.len(), file.orders.len());

    let chevalier = previews
        .iter()
        .find(|p| p.customer == "Vins et alcools Chevalier")
        .expect("order 10248 present");
    assert_eq!(chevalier.totals.subtotal.to_string(), "440.00");
    assert_eq!(chevalier.totals.total.to_string(), "472.38");

    let toms = previews
        .iter()
        .find(|p| p.customer == "Toms Spezialitäten")
        .expect("second order present");
    assert_eq!(toms.totals.subtotal.to_string(), "162.00");
    assert_eq!(toms.totals.total.to_string(), "173.61");
}

#[tokio::test]
async fn test_missing_seed_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = SeedFile::from_path(&dir.path().join("nope.yaml")).await;
    assert!(matches!(result, Err(SeedError::Io { .. })));
}

#[test]
fn test_line_for_unknown_product_is_rejected() {
    let file = SeedFile::from_yaml(
        "\
customers:
  - name: Alfreds Futterkiste
orders:
  - customer: Alfreds Futterkiste
    order_date: 1996-07-04
    required_date: 1996-08-01
    lines:
      - product: Chai
        quantity: 1
",
    )
    .expect("valid YAML");

    let result = file.preview();
    assert!(matches!(
        result,
        Err(SeedError::UnknownReference { entity: "product", ref name }) if name == "Chai"
    ));
}

#[test]
fn test_product_without_price_contributes_nothing() {
    let file = SeedFile::from_yaml(
        "\
categories:
  - name: Samples
products:
  - name: Free Sample
    category: Samples
customers:
  - name: Alfreds Futterkiste
orders:
  - customer: Alfreds Futterkiste
    order_date: 1996-07-04
    required_date: 1996-08-01
    freight: \"3.25\"
    lines:
      - product: Free Sample
        quantity: 40
",
    )
    .expect("valid YAML");

    let previews = file.preview().expect("valid file");
    let totals = previews.first().expect("one order").totals;
    assert!(totals.subtotal.is_zero());
    assert_eq!(totals.total.to_string(), "3.25");
}
