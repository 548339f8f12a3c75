//! Static print catalog
//!
//! Products carry their own size options; materials are shared by every
//! product. Both tables are fixed at compile time and only ever read.

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Product {
    pub id: &'static str,
    pub label: &'static str,
    /// Label shown by the standalone calculator, which has no size picker.
    pub calculator_label: &'static str,
    pub icon: &'static str,
    /// Per-unit price before size, material and volume adjustments.
    pub base_price: Decimal,
    pub sizes: &'static [Size],
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Size {
    pub id: &'static str,
    pub label: &'static str,
    pub multiplier: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Material {
    pub id: &'static str,
    pub label: &'static str,
    pub multiplier: Decimal,
}

impl Product {
    /// Sizes are scoped to their product: `a4` of posters is not `a4` of flyers.
    pub fn size(&self, id: &str) -> Option<&'static Size> {
        self.sizes.iter().find(|s| s.id == id)
    }
}

const fn size(id: &'static str, label: &'static str, multiplier: Decimal) -> Size {
    Size { id, label, multiplier }
}

pub static PRODUCTS: &[Product] = &[
    Product {
        id: "business-cards",
        label: "Business cards",
        calculator_label: "Business cards",
        icon: "CreditCard",
        base_price: Decimal::from_parts(5, 0, 0, false, 1),
        sizes: &[
            size("90x50", "90×50 mm (standard)", Decimal::from_parts(1, 0, 0, false, 0)),
            size("85x55", "85×55 mm (euro)", Decimal::from_parts(11, 0, 0, false, 1)),
        ],
    },
    Product {
        id: "posters",
        label: "Posters",
        calculator_label: "Posters A3",
        icon: "Image",
        base_price: Decimal::from_parts(5, 0, 0, false, 0),
        sizes: &[
            size("a4", "A4 (210×297 mm)", Decimal::from_parts(1, 0, 0, false, 0)),
            size("a3", "A3 (297×420 mm)", Decimal::from_parts(15, 0, 0, false, 1)),
            size("a2", "A2 (420×594 mm)", Decimal::from_parts(25, 0, 0, false, 1)),
            size("a1", "A1 (594×841 mm)", Decimal::from_parts(4, 0, 0, false, 0)),
        ],
    },
    Product {
        id: "flyers",
        label: "Flyers",
        calculator_label: "Flyers A5",
        icon: "FileText",
        base_price: Decimal::from_parts(15, 0, 0, false, 1),
        sizes: &[
            size("a6", "A6 (105×148 mm)", Decimal::from_parts(8, 0, 0, false, 1)),
            size("a5", "A5 (148×210 mm)", Decimal::from_parts(1, 0, 0, false, 0)),
            size("a4", "A4 (210×297 mm)", Decimal::from_parts(13, 0, 0, false, 1)),
        ],
    },
    Product {
        id: "booklets",
        label: "Booklets",
        calculator_label: "Booklets",
        icon: "Book",
        base_price: Decimal::from_parts(3, 0, 0, false, 0),
        sizes: &[
            size("a5", "A5 (148×210 mm)", Decimal::from_parts(1, 0, 0, false, 0)),
            size("a4", "A4 (210×297 mm)", Decimal::from_parts(14, 0, 0, false, 1)),
        ],
    },
    Product {
        id: "photobooks",
        label: "Photo books",
        calculator_label: "Photo books",
        icon: "BookOpen",
        base_price: Decimal::from_parts(15, 0, 0, false, 0),
        sizes: &[
            size("20x20", "20×20 cm", Decimal::from_parts(1, 0, 0, false, 0)),
            size("30x30", "30×30 cm", Decimal::from_parts(18, 0, 0, false, 1)),
        ],
    },
    Product {
        id: "calendars",
        label: "Calendars",
        calculator_label: "Calendars",
        icon: "Calendar",
        base_price: Decimal::from_parts(8, 0, 0, false, 0),
        sizes: &[
            size("a4", "A4 wall calendar", Decimal::from_parts(1, 0, 0, false, 0)),
            size("a3", "A3 wall calendar", Decimal::from_parts(15, 0, 0, false, 1)),
        ],
    },
];

pub static MATERIALS: &[Material] = &[
    Material { id: "standard", label: "Standard (300 g/m²)", multiplier: Decimal::from_parts(1, 0, 0, false, 0) },
    Material { id: "premium", label: "Premium (350 g/m²)", multiplier: Decimal::from_parts(13, 0, 0, false, 1) },
    Material { id: "glossy", label: "Glossy (300 g/m²)", multiplier: Decimal::from_parts(12, 0, 0, false, 1) },
    Material { id: "matte", label: "Matte (350 g/m²)", multiplier: Decimal::from_parts(14, 0, 0, false, 1) },
];

pub fn product(id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}

pub fn material(id: &str) -> Option<&'static Material> {
    MATERIALS.iter().find(|m| m.id == id)
}
