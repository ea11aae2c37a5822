//! Sale and purchase drafts: line totals, validation, and submission.
//!
//! Multi-line forms post repeated `garment_id`, `quantity`, `price_per_gram`
//! (and for sales `profit_grams`) fields. Lines are matched up by position.

use std::str::FromStr;

use chrono::NaiveDate;
use joyeria_core::{ClientId, GarmentId, Grams, Money, PaymentMethodId, SupplierId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::api::{
    ApiClient, ApiError, Garment, NewFinancing, NewPurchase, NewPurchaseLine, NewSale,
    NewSaleLine, Purchase, Sale,
};
use crate::error::ValidationError;

/// What the submit button asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Record the sale or purchase.
    Submit,
    /// Recompute totals and re-render.
    Preview,
    /// Re-render with one more empty line.
    AddRow,
}

impl FormAction {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "preview" => Self::Preview,
            "add_row" => Self::AddRow,
            _ => Self::Submit,
        }
    }
}

/// Garments that can be sold: not archived and with stock left.
#[must_use]
pub fn saleable(garments: Vec<Garment>) -> Vec<Garment> {
    garments
        .into_iter()
        .filter(|g| !g.archivado && g.existencia > 0)
        .collect()
}

/// A client's sales, in API order.
#[must_use]
pub fn sales_for_client(sales: &[Sale], client: ClientId) -> Vec<Sale> {
    sales
        .iter()
        .filter(|s| s.cliente == Some(client))
        .cloned()
        .collect()
}

/// A supplier's purchases, in API order.
#[must_use]
pub fn purchases_for_supplier(purchases: &[Purchase], supplier: SupplierId) -> Vec<Purchase> {
    purchases
        .iter()
        .filter(|p| p.proveedor == Some(supplier))
        .cloned()
        .collect()
}

fn lenient_decimal(value: &str) -> Decimal {
    Decimal::from_str(value.trim()).unwrap_or_default()
}

fn lenient_int(value: &str) -> i64 {
    value.trim().parse().unwrap_or_default()
}

/// Largest price per gram the store accepts (ten digits, two decimals).
const MAX_PRICE_PER_GRAM: Decimal = Decimal::from_parts(0x540B_E3FF, 2, 0, false, 2); // 99_999_999.99

/// Largest profit in grams per line (eight digits, two decimals).
const MAX_PROFIT_GRAMS: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2); // 999_999.99

const TOO_LARGE: &str = "Valor demasiado grande";

/// Product of `factors`, or `None` when it does not fit a `Decimal`.
fn checked_product(factors: &[Decimal]) -> Option<Decimal> {
    factors
        .iter()
        .try_fold(Decimal::ONE, |acc, factor| acc.checked_mul(*factor))
}

/// Line amounts shown while typing saturate instead of overflowing.
fn saturating_product(factors: &[Decimal]) -> Money {
    Money::new(checked_product(factors).unwrap_or(Decimal::MAX))
}

fn parse_id(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

fn nth(values: &[String], index: usize) -> String {
    values.get(index).cloned().unwrap_or_default()
}

fn find_garment(catalogue: &[Garment], raw_id: &str) -> Option<Garment> {
    let id = parse_id(raw_id)?;
    catalogue.iter().find(|g| g.id.as_i64() == id).cloned()
}

// =============================================================================
// Sales
// =============================================================================

/// Raw sale form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleForm {
    #[serde(default)]
    pub cliente: String,
    #[serde(default)]
    pub metodo_pago: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub credito: Option<String>,
    #[serde(default)]
    pub apartado: Option<String>,
    #[serde(default)]
    pub cantidad_cuotas: String,
    #[serde(default)]
    pub interes: String,
    #[serde(default)]
    pub fecha_limite: String,
    #[serde(default)]
    pub garment_id: Vec<String>,
    #[serde(default)]
    pub quantity: Vec<String>,
    #[serde(default)]
    pub price_per_gram: Vec<String>,
    #[serde(default)]
    pub profit_grams: Vec<String>,
    #[serde(default)]
    pub action: String,
}

impl SaleForm {
    /// A blank form with one empty line.
    #[must_use]
    pub fn blank() -> Self {
        let mut form = Self::default();
        form.add_row();
        form
    }

    pub fn add_row(&mut self) {
        let rows = self.row_count();
        for column in [
            &mut self.garment_id,
            &mut self.quantity,
            &mut self.price_per_gram,
            &mut self.profit_grams,
        ] {
            column.resize(rows, String::new());
            column.push(String::new());
        }
    }

    fn row_count(&self) -> usize {
        self.garment_id
            .len()
            .max(self.quantity.len())
            .max(self.price_per_gram.len())
            .max(self.profit_grams.len())
    }

    #[must_use]
    pub fn action(&self) -> FormAction {
        FormAction::parse(&self.action)
    }

    #[must_use]
    pub const fn is_credit(&self) -> bool {
        self.credito.is_some()
    }

    #[must_use]
    pub const fn is_layaway(&self) -> bool {
        self.apartado.is_some()
    }
}

/// One line of a sale as typed, with the garment it refers to.
#[derive(Debug, Clone)]
pub struct SaleLine {
    pub garment_id: String,
    pub quantity: String,
    pub price_per_gram: String,
    pub profit_grams: String,
    pub garment: Option<Garment>,
}

impl SaleLine {
    fn unit_grams(&self) -> Grams {
        self.garment.as_ref().map_or_else(Grams::zero, |g| g.gramos)
    }

    /// Grams × price per gram × quantity. Unparseable inputs count as zero.
    #[must_use]
    pub fn total(&self) -> Money {
        saturating_product(&[
            self.unit_grams().value(),
            lenient_decimal(&self.price_per_gram),
            Decimal::from(lenient_int(&self.quantity)),
        ])
    }

    /// Profit grams × price per gram × quantity.
    #[must_use]
    pub fn profit(&self) -> Money {
        saturating_product(&[
            lenient_decimal(&self.profit_grams),
            lenient_decimal(&self.price_per_gram),
            Decimal::from(lenient_int(&self.quantity)),
        ])
    }

    const fn is_blank(&self) -> bool {
        self.garment_id.is_empty()
    }
}

/// Sums shown under the sale lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleTotals {
    pub total: Money,
    pub profit: Money,
}

/// How a sale is financed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinancingPlan {
    Credit {
        installments: i64,
        interest: Decimal,
        deadline: NaiveDate,
    },
    Layaway {
        installments: i64,
        deadline: NaiveDate,
    },
}

impl FinancingPlan {
    #[must_use]
    pub const fn to_api(self) -> NewFinancing {
        match self {
            Self::Credit {
                installments,
                interest,
                deadline,
            } => NewFinancing::credit(installments, interest, deadline),
            Self::Layaway {
                installments,
                deadline,
            } => NewFinancing::layaway(installments, deadline),
        }
    }
}

/// A sold garment and the stock it leaves behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockChange {
    pub garment: GarmentId,
    pub remaining: i64,
}

/// A sale that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSale {
    pub client: ClientId,
    pub method: PaymentMethodId,
    pub description: String,
    pub financing: Option<FinancingPlan>,
    pub lines: Vec<NewSaleLine>,
    pub stock: Vec<StockChange>,
}

/// A sale form resolved against the garment catalogue.
#[derive(Debug, Clone)]
pub struct SaleDraft {
    pub form: SaleForm,
    pub lines: Vec<SaleLine>,
}

impl SaleDraft {
    #[must_use]
    pub fn new(form: SaleForm, catalogue: &[Garment]) -> Self {
        let lines = (0..form.row_count())
            .map(|i| {
                let garment_id = nth(&form.garment_id, i).trim().to_string();
                SaleLine {
                    garment: find_garment(catalogue, &garment_id),
                    garment_id,
                    quantity: nth(&form.quantity, i),
                    price_per_gram: nth(&form.price_per_gram, i),
                    profit_grams: nth(&form.profit_grams, i),
                }
            })
            .collect();
        Self { form, lines }
    }

    #[must_use]
    pub fn totals(&self) -> SaleTotals {
        SaleTotals {
            total: self.lines.iter().map(SaleLine::total).sum(),
            profit: self.lines.iter().map(SaleLine::profit).sum(),
        }
    }

    /// # Errors
    ///
    /// Returns the first problem found, checking the header fields, then
    /// financing, then each line in order.
    pub fn validate(&self) -> Result<ValidSale, ValidationError> {
        let client = parse_id(&self.form.cliente)
            .map(ClientId::new)
            .ok_or_else(|| ValidationError::new("cliente", "Seleccione un cliente"))?;
        let method = parse_id(&self.form.metodo_pago)
            .map(PaymentMethodId::new)
            .ok_or_else(|| ValidationError::new("metodo_pago", "Seleccione un método de pago"))?;
        let financing = self.financing()?;

        let mut lines = Vec::new();
        let mut stock: Vec<(Garment, i64)> = Vec::new();
        for line in self.lines.iter().filter(|l| !l.is_blank()) {
            let garment = line.garment.as_ref().ok_or_else(|| {
                ValidationError::new("garment_id", "La prenda seleccionada no está disponible")
            })?;
            let quantity = line
                .quantity
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|q| *q >= 1)
                .ok_or_else(|| ValidationError::new("quantity", "La cantidad debe ser al menos 1"))?;
            let price = price_per_gram(&line.price_per_gram)?;
            let profit = non_negative(&line.profit_grams).ok_or_else(|| {
                ValidationError::new(
                    "profit_grams",
                    "Los gramos de ganancia deben ser mayores o iguales a 0",
                )
            })?;
            if profit > MAX_PROFIT_GRAMS {
                return Err(ValidationError::new("profit_grams", TOO_LARGE));
            }
            let quantity_factor = Decimal::from(quantity);
            checked_product(&[garment.gramos.value(), price, quantity_factor])
                .and(checked_product(&[profit, price, quantity_factor]))
                .ok_or_else(|| ValidationError::new("price_per_gram", TOO_LARGE))?;

            // The same garment on several lines draws from one stock.
            let sold = match stock.iter_mut().find(|(g, _)| g.id == garment.id) {
                Some((_, sold)) => {
                    *sold += quantity;
                    *sold
                }
                None => {
                    stock.push((garment.clone(), quantity));
                    quantity
                }
            };
            if sold > garment.existencia {
                return Err(ValidationError::new(
                    "quantity",
                    format!(
                        "No hay suficiente existencia para \"{}\". Disponible: {}",
                        garment.nombre, garment.existencia
                    ),
                ));
            }

            lines.push(NewSaleLine {
                prenda: garment.id,
                cantidad: quantity,
                precio_por_gramo: price,
                gramo_ganancia: profit,
            });
        }

        if lines.is_empty() {
            return Err(ValidationError::new(
                "garment_id",
                "Agregue al menos una prenda",
            ));
        }

        Ok(ValidSale {
            client,
            method,
            description: self.form.descripcion.trim().to_string(),
            financing,
            lines,
            stock: stock
                .into_iter()
                .map(|(g, sold)| StockChange {
                    garment: g.id,
                    remaining: g.existencia - sold,
                })
                .collect(),
        })
    }

    fn financing(&self) -> Result<Option<FinancingPlan>, ValidationError> {
        let form = &self.form;
        if form.is_credit() && form.is_layaway() {
            return Err(ValidationError::new(
                "credito",
                "Una venta no puede ser a crédito y apartado al mismo tiempo",
            ));
        }
        if !form.is_credit() && !form.is_layaway() {
            return Ok(None);
        }

        let installments = form
            .cantidad_cuotas
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                ValidationError::new("cantidad_cuotas", "Ingrese una cantidad de cuotas válida")
            })?;
        let deadline = NaiveDate::parse_from_str(form.fecha_limite.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::new("fecha_limite", "Seleccione una fecha límite"))?;

        if form.is_layaway() {
            return Ok(Some(FinancingPlan::Layaway {
                installments,
                deadline,
            }));
        }

        let interest = non_negative(&form.interes)
            .ok_or_else(|| ValidationError::new("interes", "Ingrese un interés válido"))?;
        Ok(Some(FinancingPlan::Credit {
            installments,
            interest,
            deadline,
        }))
    }
}

fn non_negative(value: &str) -> Option<Decimal> {
    Decimal::from_str(value.trim())
        .ok()
        .filter(|d| !d.is_sign_negative() || d.is_zero())
}

fn price_per_gram(value: &str) -> Result<Decimal, ValidationError> {
    let price = non_negative(value).ok_or_else(|| {
        ValidationError::new(
            "price_per_gram",
            "El precio por gramo debe ser mayor o igual a 0",
        )
    })?;
    if price > MAX_PRICE_PER_GRAM {
        return Err(ValidationError::new("price_per_gram", TOO_LARGE));
    }
    Ok(price)
}

/// Record a sale.
///
/// The credit or layaway is opened first so the sale can reference it, then
/// the sale is created, then each sold garment's stock is lowered. A failure
/// part way leaves earlier steps in place.
///
/// # Errors
///
/// Returns the first API error encountered.
#[instrument(skip(api, sale), fields(client = %sale.client, lines = sale.lines.len()))]
pub async fn submit_sale(api: &ApiClient, sale: &ValidSale) -> Result<Sale, ApiError> {
    let (mut credito, mut apartado) = (None, None);
    match sale.financing {
        Some(plan @ FinancingPlan::Credit { .. }) => {
            credito = Some(api.create_credit(&plan.to_api()).await?);
        }
        Some(plan @ FinancingPlan::Layaway { .. }) => {
            apartado = Some(api.create_layaway(&plan.to_api()).await?);
        }
        None => {}
    }

    let created = api
        .create_sale(&NewSale {
            cliente: sale.client,
            descripcion: sale.description.clone(),
            metodo_pago: sale.method,
            credito,
            apartado,
            prendas: sale.lines.clone(),
        })
        .await?;

    for change in &sale.stock {
        api.set_stock(change.garment, change.remaining).await?;
    }

    Ok(created)
}

// =============================================================================
// Purchases
// =============================================================================

/// Raw purchase form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseForm {
    #[serde(default)]
    pub proveedor: String,
    #[serde(default)]
    pub metodo_pago: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub garment_id: Vec<String>,
    #[serde(default)]
    pub quantity: Vec<String>,
    #[serde(default)]
    pub price_per_gram: Vec<String>,
    #[serde(default)]
    pub action: String,
}

impl PurchaseForm {
    /// A blank form with one line of quantity 1.
    #[must_use]
    pub fn blank() -> Self {
        let mut form = Self::default();
        form.add_row();
        form
    }

    pub fn add_row(&mut self) {
        let rows = self.row_count();
        self.garment_id.resize(rows, String::new());
        self.quantity.resize(rows, String::new());
        self.price_per_gram.resize(rows, String::new());
        self.garment_id.push(String::new());
        self.quantity.push("1".to_string());
        self.price_per_gram.push(String::new());
    }

    fn row_count(&self) -> usize {
        self.garment_id
            .len()
            .max(self.quantity.len())
            .max(self.price_per_gram.len())
    }

    #[must_use]
    pub fn action(&self) -> FormAction {
        FormAction::parse(&self.action)
    }
}

/// One purchase line as typed.
#[derive(Debug, Clone)]
pub struct PurchaseLine {
    pub garment_id: String,
    pub quantity: String,
    pub price_per_gram: String,
    pub garment: Option<Garment>,
}

impl PurchaseLine {
    /// Grams × quantity × price per gram; zero until a garment is chosen.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        let Some(garment) = &self.garment else {
            return Money::zero();
        };
        saturating_product(&[
            garment.gramos.value(),
            Decimal::from(lenient_int(&self.quantity)),
            lenient_decimal(&self.price_per_gram),
        ])
    }
}

/// A purchase form resolved against the garment catalogue.
#[derive(Debug, Clone)]
pub struct PurchaseDraft {
    pub form: PurchaseForm,
    pub lines: Vec<PurchaseLine>,
}

impl PurchaseDraft {
    #[must_use]
    pub fn new(form: PurchaseForm, catalogue: &[Garment]) -> Self {
        let lines = (0..form.row_count())
            .map(|i| {
                let garment_id = nth(&form.garment_id, i).trim().to_string();
                PurchaseLine {
                    garment: find_garment(catalogue, &garment_id),
                    garment_id,
                    quantity: nth(&form.quantity, i),
                    price_per_gram: nth(&form.price_per_gram, i),
                }
            })
            .collect();
        Self { form, lines }
    }

    #[must_use]
    pub fn total(&self) -> Money {
        self.lines.iter().map(PurchaseLine::subtotal).sum()
    }

    /// # Errors
    ///
    /// Returns the first missing header field or invalid line.
    pub fn validate(&self) -> Result<NewPurchase, ValidationError> {
        let proveedor = parse_id(&self.form.proveedor)
            .map(SupplierId::new)
            .ok_or_else(|| ValidationError::new("proveedor", "Seleccione un proveedor"))?;
        let metodo_pago = parse_id(&self.form.metodo_pago)
            .map(PaymentMethodId::new)
            .ok_or_else(|| ValidationError::new("metodo_pago", "Seleccione un método de pago"))?;

        let mut prendas = Vec::new();
        for line in self.lines.iter().filter(|l| !l.garment_id.is_empty()) {
            let garment = line.garment.as_ref().ok_or_else(|| {
                ValidationError::new("garment_id", "La prenda seleccionada no está disponible")
            })?;
            let cantidad = line
                .quantity
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|q| *q >= 1)
                .ok_or_else(|| ValidationError::new("quantity", "La cantidad debe ser al menos 1"))?;
            let precio_por_gramo = price_per_gram(&line.price_per_gram)?;
            checked_product(&[
                garment.gramos.value(),
                Decimal::from(cantidad),
                precio_por_gramo,
            ])
            .ok_or_else(|| ValidationError::new("price_per_gram", TOO_LARGE))?;
            prendas.push(NewPurchaseLine {
                prenda: garment.id,
                cantidad,
                precio_por_gramo,
            });
        }

        if prendas.is_empty() {
            return Err(ValidationError::new(
                "garment_id",
                "Agregue al menos una prenda",
            ));
        }

        Ok(NewPurchase {
            proveedor,
            metodo_pago,
            descripcion: self.form.descripcion.trim().to_string(),
            prendas,
        })
    }
}
