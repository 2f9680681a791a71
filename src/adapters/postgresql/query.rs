//! SQL issued by an extraction session

/// Sets the segment context; takes the upper-cased segment code
pub const SET_SEGMENT_CALL: &str = "CALL pk_erp.p_set_segment_no($1)";

/// Stages the MRIF004 report rows for a date
pub const MATERIALIZE_REPORT_CALL: &str = "CALL argoerp.p_rpt_mrif004($1)";

/// Number of columns returned by [`EXTRACTION_QUERY`]
pub const EXTRACTION_COLUMN_COUNT: usize = 29;

/// Position of the integer line number in [`EXTRACTION_QUERY`]
pub const LINE_NO_POSITION: usize = 22;

/// Reads the staged report
///
/// Header columns are only projected on the first line of each invoice.
pub const EXTRACTION_QUERY: &str = r#"
SELECT TRIM(a.var_attr01) AS invoice_number,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN TO_CHAR(a.date_attr01, 'YYYYMMDD') END) AS invoice_date,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.var_attr02 END) AS invoice_time,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.var_attr03 END) AS buyer_identifier,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.var_attr04 END) AS buyer_name,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.var_attr05 END) AS buyer_address,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.var_attr06 END) AS buyer_telephone_number,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.var_attr07 END) AS buyer_email_address,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.num_attr01::text END) AS sales_amount,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.num_attr02::text END) AS free_tax_sales_amount,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.num_attr03::text END) AS zero_tax_sales_amount,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.var_attr08 END) AS tax_type,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN TO_CHAR(a.num_attr04, '0.99') END) AS tax_rate,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.num_attr05::text END) AS tax_amount,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.num_attr06::text END) AS total_amount,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.var_attr09 END) AS print_mark,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.num_attr07::text END) AS random_number,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.var_attr10 END) AS main_remark,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.var_attr11 END) AS carrier_type,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.var_attr12 END) AS carrier_id1,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.var_attr13 END) AS carrier_id2,
       TRIM(CASE WHEN a.num_attr08 = 1 THEN a.var_attr14 END) AS npoban,
       a.num_attr08::int4 AS line_no,
       TRIM(a.var_attr15) AS description,
       TRIM(a.num_attr09::text) AS quantity,
       TRIM(a.num_attr10::text) AS unit_price,
       TRIM(a.num_attr11::text) AS amount,
       TRIM(a.var_attr08) AS detail_tax_type,
       TRIM(a.var_attr16) AS remark
  FROM argoerp.mr_global_temp a
 WHERE a.pid = 'MRIF004'
 ORDER BY a.var_attr01, a.num_attr08
"#;
