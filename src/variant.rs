//! VCF records: parsing, variant classification, and genotype decoding.
//!
//! A [`VariantRecord`] stores the fields of one data line that the index
//! build needs: the 0-based reference offset, the two alleles, annotation
//! hints from the INFO column, and the raw per-sample genotype columns.
//! Genotype columns are decoded lazily with [`Genotype::parse`], so records
//! that are skipped by the build are never validated.
//!
//! Parsing is based on bytes rather than characters to avoid unnecessary
//! UTF-8 validation.

use crate::{Error, Result};


//-----------------------------------------------------------------------------

/// The kind of a biallelic variant.
///
/// The kind decides how the variant is resolved to a graph edge.
/// Insertions are classified but not resolved; the build pass skips them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariantKind {
    /// Substitution of one or more bases; allele lengths are equal.
    Snp,
    /// The alternate allele is shorter than the reference allele.
    Deletion,
    /// The alternate allele is longer than the reference allele.
    Insertion,
}

//-----------------------------------------------------------------------------

/// A phased genotype call for one diploid sample at a biallelic site.
///
/// Sample `i` owns haplotype identifiers `2 * i` and `2 * i + 1`.
/// The call decides which of the two identifiers support the alternate
/// allele. Unphased calls are only accepted when both alleles are identical,
/// because phase does not matter in that case.
///
/// # Examples
///
/// ```
/// use vcf_map::Genotype;
///
/// assert_eq!(Genotype::parse(b"0|1").unwrap(), Genotype::RefAlt);
/// assert_eq!(Genotype::parse(b"1/1").unwrap(), Genotype::AltAlt);
/// // Additional colon-separated subfields are ignored.
/// assert_eq!(Genotype::parse(b"1|0:35:12,9").unwrap(), Genotype::AltRef);
/// assert!(Genotype::parse(b"0/1").is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Genotype {
    /// Both copies carry the reference allele.
    RefRef,
    /// Copy 1 carries the alternate allele.
    RefAlt,
    /// Copy 0 carries the alternate allele.
    AltRef,
    /// Both copies carry the alternate allele.
    AltAlt,
    /// The genotype is unknown for both copies.
    Missing,
}

impl Genotype {
    /// Parses the genotype from the first three bytes of a sample column.
    ///
    /// Returns [`Error::UnphasedGenotype`] for unphased heterozygous calls
    /// and for tokens that are not genotypes at all.
    pub fn parse(field: &[u8]) -> Result<Self> {
        if field.len() < 3 {
            return Err(Error::UnphasedGenotype(String::from_utf8_lossy(field).into_owned()));
        }
        match &field[0..3] {
            b"0|0" | b"0/0" => Ok(Genotype::RefRef),
            b"0|1" => Ok(Genotype::RefAlt),
            b"1|0" => Ok(Genotype::AltRef),
            b"1|1" | b"1/1" => Ok(Genotype::AltAlt),
            b"./." => Ok(Genotype::Missing),
            token => Err(Error::UnphasedGenotype(String::from_utf8_lossy(token).into_owned())),
        }
    }
}

//-----------------------------------------------------------------------------

/// One parsed VCF data line.
///
/// Only biallelic records can be parsed; an alternate allele list fails with
/// [`Error::MultiAllelicVariant`] before classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantRecord {
    /// 0-based offset of the record on the reference path.
    pub offset: usize,
    /// Reference allele.
    pub reference: Vec<u8>,
    /// Alternate allele.
    pub alternate: Vec<u8>,
    /// The INFO column carries `VT=SNP`.
    pub snp_hint: bool,
    /// The INFO column carries `VT=INDEL`.
    pub indel_hint: bool,
    /// Raw genotype columns, one per sample, in header order.
    pub genotypes: Vec<Vec<u8>>,
}

impl VariantRecord {
    // CHROM, POS, ID, REF, ALT, QUAL, FILTER, INFO.
    const MANDATORY_FIELDS: usize = 8;

    // Genotype columns start after the FORMAT column.
    const FIRST_SAMPLE_FIELD: usize = 9;

    // Parses a 1-based position from a VCF field.
    fn parse_position(field: &[u8]) -> Result<usize> {
        let number = std::str::from_utf8(field).map_err(|err| {
            Error::InvalidRecord(format!("invalid position: {}", err))
        })?;
        let position: usize = number.parse().map_err(|err| {
            Error::InvalidRecord(format!("invalid position {}: {}", number, err))
        })?;
        if position == 0 {
            return Err(Error::InvalidRecord(String::from("position must be 1-based")));
        }
        Ok(position)
    }

    /// Parses a record from a VCF data line.
    ///
    /// Fields may be separated by tabs or spaces; runs of separators are
    /// treated as one. The line may end with up to one endline character,
    /// which is ignored.
    pub fn parse(line: &[u8]) -> Result<Self> {
        let line = if line.last() == Some(&b'\n') { &line[..line.len() - 1] } else { line };
        let fields: Vec<&[u8]> = line
            .split(|&c| c == b'\t' || c == b' ')
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() < Self::MANDATORY_FIELDS {
            return Err(Error::InvalidRecord(format!(
                "expected at least {} fields, got {}", Self::MANDATORY_FIELDS, fields.len()
            )));
        }

        let position = Self::parse_position(fields[1])?;
        let reference = fields[3].to_vec();
        let alternate = fields[4].to_vec();
        if alternate.contains(&b',') {
            return Err(Error::MultiAllelicVariant(position));
        }

        let info = fields[7];
        let snp_hint = info.split(|&c| c == b';').any(|entry| entry == b"VT=SNP");
        let indel_hint = info.split(|&c| c == b';').any(|entry| entry == b"VT=INDEL");

        let genotypes = if fields.len() > Self::FIRST_SAMPLE_FIELD {
            fields[Self::FIRST_SAMPLE_FIELD..].iter().map(|f| f.to_vec()).collect()
        } else {
            Vec::new()
        };

        Ok(VariantRecord {
            offset: position - 1,
            reference, alternate,
            snp_hint, indel_hint,
            genotypes,
        })
    }

    /// Returns the 1-based position of the record.
    #[inline]
    pub fn position(&self) -> usize {
        self.offset + 1
    }

    /// Determines the kind of the variant.
    ///
    /// Equal allele lengths or a `VT=SNP` annotation give a substitution.
    /// Unequal lengths are only interpreted as an indel when the record
    /// carries a `VT=INDEL` annotation; anything else fails with
    /// [`Error::UnsupportedVariantType`].
    pub fn classify(&self) -> Result<VariantKind> {
        if self.reference.len() == self.alternate.len() || self.snp_hint {
            return Ok(VariantKind::Snp);
        }
        if self.indel_hint {
            if self.reference.len() > self.alternate.len() {
                return Ok(VariantKind::Deletion);
            } else {
                return Ok(VariantKind::Insertion);
            }
        }
        Err(Error::UnsupportedVariantType {
            position: self.position(),
            reference: String::from_utf8_lossy(&self.reference).into_owned(),
            alternate: String::from_utf8_lossy(&self.alternate).into_owned(),
        })
    }

    /// Decodes the genotype of the sample with the given rank.
    ///
    /// Returns [`None`] if the record does not have that many samples.
    pub fn genotype(&self, sample: usize) -> Option<Result<Genotype>> {
        self.genotypes.get(sample).map(|field| Genotype::parse(field))
    }
}

//-----------------------------------------------------------------------------
