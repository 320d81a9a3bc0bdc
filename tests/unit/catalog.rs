use super::*;

const CATALOG: &str = r#"[
  {
    "name": "Couture",
    "material_image": "/telas/Couture.png",
    "variants": [
      {
        "name": "Basting",
        "material_image": "/telas/couture/Basting.png",
        "hardware_type": "Cierre Invisible",
        "hardware_image": "/cierres/metalico.png",
        "example_image": "/combinaciones/crewel_combinada.jpg"
      },
      {
        "name": "Seam",
        "hardware_type": "Botones Clásicos",
        "hardware_image": "/cierres/botones.jpg"
      }
    ]
  },
  {
    "name": "Denim",
    "material_image": "/telas/denim.jpg",
    "hardware_type": "Cierre Metálico",
    "hardware_image": "/cierres/metalico.png"
  },
  { "name": "Lino", "material_image": "/telas/lino.jpg" }
]"#;

#[test]
fn flattens_variants_and_skips_incomplete_entries() {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let reqs = catalog.preview_requests();
    let names: Vec<&str> = reqs.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Couture/Basting", "Couture/Seam", "Denim"]);

    assert_eq!(reqs[0].material_image, "/telas/couture/Basting.png");
    assert_eq!(
        reqs[0].example_image.as_deref(),
        Some("/combinaciones/crewel_combinada.jpg")
    );
    // Seam has no material of its own and inherits the parent's.
    assert_eq!(reqs[1].material_image, "/telas/Couture.png");
    assert_eq!(reqs[1].hardware_type.as_deref(), Some("Botones Clásicos"));
    assert_eq!(reqs[2].slug, "denim");
}

#[test]
fn slugs_are_file_safe() {
    assert_eq!(slugify("Couture/Basting"), "couture-basting");
    assert_eq!(slugify("  Cremallera  Metálica! "), "cremallera-metálica");
    assert_eq!(slugify("///"), "preview");
}

#[test]
fn rejects_unnamed_entries_and_unknown_fields() {
    assert!(Catalog::from_json_str(r#"[{ "name": " " }]"#).is_err());
    assert!(Catalog::from_json_str(r#"[{ "name": "x", "colour": "y" }]"#).is_err());
    assert!(Catalog::from_json_str("{").is_err());
}

#[test]
fn reads_storefront_key_spelling() {
    let catalog = Catalog::from_json_str(
        r#"[
          {
            "nombre": "Couture",
            "imagenTela": "/telas/Couture.png",
            "tipos": [
              {
                "nombre": "Bobbin",
                "imagenTela": "/telas/couture/Bobbin.png",
                "tipoCierre": "Cremallera Metálica",
                "imagenCierre": "/cierres/metalico.png",
                "imagenCombinada": "/combinaciones/shears_combinada.jpg"
              }
            ]
          }
        ]"#,
    )
    .unwrap();

    let reqs = catalog.preview_requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].name, "Couture/Bobbin");
    assert_eq!(reqs[0].material_image, "/telas/couture/Bobbin.png");
    assert_eq!(reqs[0].hardware_image, "/cierres/metalico.png");
    assert_eq!(reqs[0].hardware_type.as_deref(), Some("Cremallera Metálica"));
    assert_eq!(
        reqs[0].example_image.as_deref(),
        Some("/combinaciones/shears_combinada.jpg")
    );
}

#[test]
fn colliding_slugs_get_numeric_suffixes() {
    let catalog = Catalog::from_json_str(
        r#"[
          { "name": "Denim Azul", "material_image": "/a.png", "hardware_image": "/h.png" },
          { "name": "denim-azul", "material_image": "/b.png", "hardware_image": "/h.png" },
          { "name": "Denim azul-2", "material_image": "/c.png", "hardware_image": "/h.png" },
          { "name": "DENIM AZUL", "material_image": "/d.png", "hardware_image": "/h.png" }
        ]"#,
    )
    .unwrap();

    let slugs: Vec<String> = catalog
        .preview_requests()
        .into_iter()
        .map(|r| r.slug)
        .collect();
    assert_eq!(
        slugs,
        vec!["denim-azul", "denim-azul-2", "denim-azul-2-2", "denim-azul-3"]
    );
}
