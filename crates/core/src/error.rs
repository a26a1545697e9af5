#![forbid(unsafe_code)]

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataError {
    InvalidFormat,
    NoColumns,
    InvalidColumnId,
    EmptyColumnName,
    EmptyNewColumnName,
    DuplicateColumnName,
    ColumnNotFound,
    LastColumn,
    InvalidItemId,
    EmptyItemName,
    DuplicateItemName,
    ItemNotFound,
    InvalidTagId,
    EmptyTagLabel,
    DuplicateTagLabel,
    TagNotFound,
    InvalidReorder,
    SourceIndexOutOfRange,
    EmptyValueLabel,
    DuplicateValueLabel,
    ValueIndexOutOfRange,
    LastValueEntry,
}

impl DataError {
    /// Stable machine-readable code; the human message stays in `Display`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat | Self::NoColumns => "INVALID_FORMAT",
            Self::ColumnNotFound | Self::ItemNotFound | Self::TagNotFound => "NOT_FOUND",
            Self::DuplicateColumnName
            | Self::DuplicateItemName
            | Self::DuplicateTagLabel
            | Self::DuplicateValueLabel => "DUPLICATE",
            Self::SourceIndexOutOfRange | Self::ValueIndexOutOfRange => "OUT_OF_RANGE",
            Self::LastColumn | Self::LastValueEntry => "MIN_CARDINALITY",
            Self::InvalidColumnId
            | Self::EmptyColumnName
            | Self::EmptyNewColumnName
            | Self::InvalidItemId
            | Self::EmptyItemName
            | Self::InvalidTagId
            | Self::EmptyTagLabel
            | Self::InvalidReorder
            | Self::EmptyValueLabel => "INVALID_INPUT",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "データ形式が不正です",
            Self::NoColumns => "列情報が存在しません",
            Self::InvalidColumnId => "列の指定が不正です",
            Self::EmptyColumnName => "列名を入力してください",
            Self::EmptyNewColumnName => "新しい列名を入力してください",
            Self::DuplicateColumnName => "同名の列が既に存在します",
            Self::ColumnNotFound => "対象の列が見つかりません",
            Self::LastColumn => "少なくとも1つの列を保持する必要があります",
            Self::InvalidItemId => "項目の指定が不正です",
            Self::EmptyItemName => "項目名を入力してください",
            Self::DuplicateItemName => "同名の項目が既に存在します",
            Self::ItemNotFound => "対象の項目が見つかりません",
            Self::InvalidTagId => "タグの指定が不正です",
            Self::EmptyTagLabel => "タグ名を入力してください",
            Self::DuplicateTagLabel => "同名のタグが既に存在します",
            Self::TagNotFound => "対象のタグが見つかりません",
            Self::InvalidReorder => "並び替えの指定が不正です",
            Self::SourceIndexOutOfRange => "移動元のインデックスが範囲外です",
            Self::EmptyValueLabel => "値のラベルを入力してください",
            Self::DuplicateValueLabel => "同名の値が既に存在します",
            Self::ValueIndexOutOfRange => "対象の値が見つかりません",
            Self::LastValueEntry => "少なくとも1つの値を保持する必要があります",
        }
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for DataError {}
