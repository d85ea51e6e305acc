//! Product model.
//!
//! Field names mirror the remote documents exactly (`nombre`, `precio`,
//! `porcentajeOferta`, `cantidadDisponible`, `detalles`); the identifier is
//! the store-assigned document key and is never part of the stored fields.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::{Validate, ValidationError};

use crate::domain::pricing;

/// A catalog product: the store-assigned identifier plus its document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(flatten)]
    pub fields: ProductFields,
}

/// The persisted fields of a product document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagen: Option<String>,
    pub precio: Decimal,
    #[serde(default)]
    pub porcentaje_oferta: Decimal,
    pub cantidad_disponible: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detalles: Option<ProductDetails>,
}

impl ProductFields {
    /// Displayed price, recomputed on every read.
    pub fn precio_final(&self) -> Decimal {
        pricing::final_price(self.precio, self.porcentaje_oferta)
    }

    /// Stock label for this product.
    pub fn disponibilidad(&self) -> String {
        pricing::availability_label(self.cantidad_disponible)
    }
}

/// Free-form product details: named attributes or an ordered list of notes.
///
/// The documents carry either a JSON object or a JSON array; absence means
/// "no details" and is modeled as `Option<ProductDetails>` on the product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductDetails {
    Attributes(HashMap<String, String>),
    Notes(Vec<String>),
}

/// A not-yet-persisted product plus its pending image payload.
///
/// Lives for the duration of one creation attempt. The caller keeps
/// ownership, so a failed attempt can be corrected and retried unchanged.
#[derive(Clone, Debug, Validate)]
pub struct ProductDraft {
    #[validate(length(min = 1, message = "nombre must not be empty"))]
    pub nombre: String,
    #[validate(length(min = 1, message = "an image payload is required"))]
    pub imagen: Vec<u8>,
    #[validate(custom = "precio_positivo")]
    pub precio: Decimal,
    #[validate(custom = "oferta_en_rango")]
    pub porcentaje_oferta: Decimal,
    pub cantidad_disponible: u32,
    pub detalles: Option<ProductDetails>,
}

impl ProductDraft {
    /// New draft with no discount and no details.
    pub fn new(
        nombre: impl Into<String>,
        imagen: Vec<u8>,
        precio: Decimal,
        cantidad_disponible: u32,
    ) -> Self {
        Self {
            nombre: nombre.into(),
            imagen,
            precio,
            porcentaje_oferta: Decimal::ZERO,
            cantidad_disponible,
            detalles: None,
        }
    }

    pub fn with_oferta(mut self, porcentaje: Decimal) -> Self {
        self.porcentaje_oferta = porcentaje;
        self
    }

    pub fn with_detalles(mut self, detalles: ProductDetails) -> Self {
        self.detalles = Some(detalles);
        self
    }

    /// Persisted fields with the uploaded asset URL threaded in. All other
    /// fields are carried over unchanged.
    pub fn fields_with_image(&self, imagen: String) -> ProductFields {
        ProductFields {
            nombre: self.nombre.clone(),
            imagen: Some(imagen),
            precio: self.precio,
            porcentaje_oferta: self.porcentaje_oferta,
            cantidad_disponible: self.cantidad_disponible,
            detalles: self.detalles.clone(),
        }
    }
}

fn precio_positivo(precio: &Decimal) -> Result<(), ValidationError> {
    if *precio > Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("precio_positivo");
        err.message = Some("precio must be greater than zero".into());
        Err(err)
    }
}

fn oferta_en_rango(porcentaje: &Decimal) -> Result<(), ValidationError> {
    if *porcentaje >= Decimal::ZERO && *porcentaje <= Decimal::ONE_HUNDRED {
        Ok(())
    } else {
        let mut err = ValidationError::new("oferta_en_rango");
        err.message = Some("porcentajeOferta must be between 0 and 100".into());
        Err(err)
    }
}
