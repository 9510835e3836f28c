use cartera_domain::normalize_identity;

/// Ledger fields with a dedicated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LedgerField {
    ClientId,
    ClientName,
    Document,
    Balance,
    DueDate,
    DaysOverdue,
    Phone,
}

/// Accepted column names per field, preferred name first.
const FIELD_ALIASES: [(LedgerField, &[&str]); 7] = [
    (LedgerField::ClientId, &["nit", "identificacion", "nit_cliente"]),
    (
        LedgerField::ClientName,
        &["cliente", "nombre_cliente", "razon_social"],
    ),
    (
        LedgerField::Document,
        &["factura", "documento", "numero_factura", "no_factura"],
    ),
    (
        LedgerField::Balance,
        &["saldo", "saldo_pendiente", "valor", "total"],
    ),
    (
        LedgerField::DueDate,
        &["fecha_vencimiento", "vencimiento"],
    ),
    (LedgerField::DaysOverdue, &["dias_vencido", "dias", "dias_mora"]),
    (LedgerField::Phone, &["telefono", "celular", "whatsapp"]),
];

/// Canonical lowercase/underscore form of a header.
///
/// `"Días Vencido"` becomes `"dias_vencido"`, `" No. Factura "` becomes
/// `"no_factura"`.
pub(super) fn canonical_column_name(raw: &str) -> String {
    let folded = normalize_identity(raw);
    let mut canonical = String::with_capacity(folded.len());
    let mut pending_separator = false;

    for character in folded.chars() {
        if character.is_alphanumeric() {
            if pending_separator && !canonical.is_empty() {
                canonical.push('_');
            }
            pending_separator = false;
            canonical.push(character);
        } else {
            pending_separator = true;
        }
    }

    canonical
}

/// Position of every known column in a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ColumnLayout {
    pub(super) salesperson: usize,
    pub(super) fields: Vec<(LedgerField, usize)>,
    pub(super) extra: Vec<(String, usize)>,
}

impl ColumnLayout {
    /// Maps canonical headers to fields. Returns `None` when the salesperson
    /// column is absent.
    pub(super) fn resolve(headers: &[String], salesperson_column: &str) -> Option<Self> {
        let salesperson_column = canonical_column_name(salesperson_column);
        let salesperson = headers
            .iter()
            .position(|header| *header == salesperson_column)?;

        let mut claimed = vec![salesperson];
        let mut fields = Vec::new();
        for (field, aliases) in FIELD_ALIASES {
            let position = aliases.iter().find_map(|alias| {
                headers
                    .iter()
                    .enumerate()
                    .position(|(index, header)| header == alias && !claimed.contains(&index))
            });
            if let Some(position) = position {
                claimed.push(position);
                fields.push((field, position));
            }
        }

        let extra = headers
            .iter()
            .enumerate()
            .filter(|(index, header)| !header.is_empty() && !claimed.contains(index))
            .map(|(index, header)| (header.clone(), index))
            .collect();

        Some(Self {
            salesperson,
            fields,
            extra,
        })
    }

    pub(super) fn position_of(&self, field: LedgerField) -> Option<usize> {
        self.fields
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, position)| *position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|header| canonical_column_name(header)).collect()
    }

    #[test]
    fn headers_are_canonicalized() {
        assert_eq!(canonical_column_name("Días Vencido"), "dias_vencido");
        assert_eq!(canonical_column_name(" No. Factura "), "no_factura");
        assert_eq!(canonical_column_name("VENDEDOR"), "vendedor");
        assert_eq!(canonical_column_name("Saldo ($)"), "saldo");
    }

    #[test]
    fn layout_maps_aliases_and_keeps_extra_columns() {
        let layout = ColumnLayout::resolve(
            &headers(&["Vendedor", "Razón Social", "NIT", "Valor", "Zona"]),
            "vendedor",
        )
        .unwrap_or_else(|| panic!("test"));

        assert_eq!(layout.salesperson, 0);
        assert_eq!(layout.position_of(LedgerField::ClientName), Some(1));
        assert_eq!(layout.position_of(LedgerField::ClientId), Some(2));
        assert_eq!(layout.position_of(LedgerField::Balance), Some(3));
        assert_eq!(layout.position_of(LedgerField::DueDate), None);
        assert_eq!(layout.extra, vec![("zona".to_owned(), 4)]);
    }

    #[test]
    fn preferred_alias_wins_over_fallback() {
        let layout = ColumnLayout::resolve(&headers(&["vendedor", "total", "saldo"]), "vendedor")
            .unwrap_or_else(|| panic!("test"));
        assert_eq!(layout.position_of(LedgerField::Balance), Some(2));
        assert_eq!(layout.extra, vec![("total".to_owned(), 1)]);
    }

    #[test]
    fn configured_salesperson_column_is_required() {
        assert!(ColumnLayout::resolve(&headers(&["cliente", "saldo"]), "vendedor").is_none());
        assert!(ColumnLayout::resolve(&headers(&["Asesor Comercial"]), "asesor comercial").is_some());
    }
}
