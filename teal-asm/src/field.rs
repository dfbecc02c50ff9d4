use core::fmt;

/// Field of the transaction currently being evaluated.
///
/// Array fields (`Accounts`, `ApplicationArgs`, `Applications`,
/// `Assets`, `Logs`) carry their index immediate; the sentinel `-1`
/// means the index is taken from the stack at run time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum TransactionField {
    Sender,
    Fee,
    FirstValid,
    FirstValidTime,
    LastValid,
    Note,
    Lease,
    Receiver,
    Amount,
    CloseRemainderTo,
    VotePK,
    SelectionPK,
    VoteFirst,
    VoteLast,
    VoteKeyDilution,
    Type,
    TypeEnum,
    XferAsset,
    AssetAmount,
    AssetSender,
    AssetReceiver,
    AssetCloseTo,
    GroupIndex,
    TxID,
    ApplicationID,
    OnCompletion,
    ApplicationArgs(i64),
    NumAppArgs,
    Accounts(i64),
    NumAccounts,
    ApprovalProgram,
    ClearStateProgram,
    RekeyTo,
    ConfigAsset,
    ConfigAssetTotal,
    ConfigAssetDecimals,
    ConfigAssetDefaultFrozen,
    ConfigAssetUnitName,
    ConfigAssetName,
    ConfigAssetURL,
    ConfigAssetMetadataHash,
    ConfigAssetManager,
    ConfigAssetReserve,
    ConfigAssetFreeze,
    ConfigAssetClawback,
    FreezeAsset,
    FreezeAssetAccount,
    FreezeAssetFrozen,
    Assets(i64),
    NumAssets,
    Applications(i64),
    NumApplications,
    GlobalNumUint,
    GlobalNumByteSlice,
    LocalNumUint,
    LocalNumByteSlice,
    ExtraProgramPages,
    Nonparticipation,
    Logs(i64),
    NumLogs,
    CreatedAssetID,
    CreatedApplicationID,
    LastLog,
    StateProofPK,
}

impl TransactionField {
    /// TEAL version that introduced the field.
    pub fn version(&self) -> u64 {
        use TransactionField::*;
        match self {
            Sender | Fee | FirstValid | LastValid | Note | Lease | Receiver | Amount
            | CloseRemainderTo | VotePK | SelectionPK | VoteFirst | VoteLast
            | VoteKeyDilution | Type | TypeEnum | XferAsset | AssetAmount | AssetSender
            | AssetReceiver | AssetCloseTo | GroupIndex | TxID => 1,
            ApplicationID | OnCompletion | ApplicationArgs(_) | NumAppArgs | Accounts(_)
            | NumAccounts | ApprovalProgram | ClearStateProgram | RekeyTo | ConfigAsset
            | ConfigAssetTotal | ConfigAssetDecimals | ConfigAssetDefaultFrozen
            | ConfigAssetUnitName | ConfigAssetName | ConfigAssetURL
            | ConfigAssetMetadataHash | ConfigAssetManager | ConfigAssetReserve
            | ConfigAssetFreeze | ConfigAssetClawback | FreezeAsset | FreezeAssetAccount
            | FreezeAssetFrozen => 2,
            Assets(_) | NumAssets | Applications(_) | NumApplications | GlobalNumUint
            | GlobalNumByteSlice | LocalNumUint | LocalNumByteSlice => 3,
            ExtraProgramPages => 4,
            Nonparticipation | Logs(_) | NumLogs | CreatedAssetID | CreatedApplicationID => 5,
            LastLog | StateProofPK => 6,
            FirstValidTime => 7,
        }
    }

    /// Array index carried by the field, if it is an array field.
    pub fn array_index(&self) -> Option<i64> {
        use TransactionField::*;
        match self {
            ApplicationArgs(i) | Accounts(i) | Applications(i) | Assets(i) | Logs(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TransactionField::*;
        match self {
            ApplicationArgs(i) => write!(f, "ApplicationArgs {i}"),
            Accounts(i) => write!(f, "Accounts {i}"),
            Applications(i) => write!(f, "Applications {i}"),
            Assets(i) => write!(f, "Assets {i}"),
            Logs(i) => write!(f, "Logs {i}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Field read by `asset_holding_get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum AssetHoldingField {
    AssetBalance,
    AssetFrozen,
}

impl AssetHoldingField {
    /// TEAL version that introduced the field.
    pub fn version(&self) -> u64 {
        2
    }
}

impl fmt::Display for AssetHoldingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Field read by `asset_params_get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum AssetParamsField {
    AssetTotal,
    AssetDecimals,
    AssetDefaultFrozen,
    AssetUnitName,
    AssetName,
    AssetURL,
    AssetMetadataHash,
    AssetManager,
    AssetReserve,
    AssetFreeze,
    AssetClawback,
    AssetCreator,
}

impl AssetParamsField {
    /// TEAL version that introduced the field.
    pub fn version(&self) -> u64 {
        match self {
            AssetParamsField::AssetCreator => 5,
            _ => 2,
        }
    }
}

impl fmt::Display for AssetParamsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Field read by `app_params_get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum AppParamsField {
    AppApprovalProgram,
    AppClearStateProgram,
    AppGlobalNumUint,
    AppGlobalNumByteSlice,
    AppLocalNumUint,
    AppLocalNumByteSlice,
    AppExtraProgramPages,
    AppCreator,
    AppAddress,
}

impl AppParamsField {
    /// TEAL version that introduced the field.
    pub fn version(&self) -> u64 {
        5
    }
}

impl fmt::Display for AppParamsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Field read by `acct_params_get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum AcctParamsField {
    AcctBalance,
    AcctMinBalance,
    AcctAuthAddr,
}

impl AcctParamsField {
    /// TEAL version that introduced the field.
    pub fn version(&self) -> u64 {
        6
    }
}

impl fmt::Display for AcctParamsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Parameter read by the `global` opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum GlobalField {
    MinTxnFee,
    MinBalance,
    MaxTxnLife,
    ZeroAddress,
    GroupSize,
    LogicSigVersion,
    Round,
    LatestTimestamp,
    CurrentApplicationID,
    CreatorAddress,
    CurrentApplicationAddress,
    GroupID,
    OpcodeBudget,
    CallerApplicationID,
    CallerApplicationAddress,
}

impl GlobalField {
    /// TEAL version that introduced the parameter.
    pub fn version(&self) -> u64 {
        use GlobalField::*;
        match self {
            MinTxnFee | MinBalance | MaxTxnLife | ZeroAddress | GroupSize => 1,
            LogicSigVersion | Round | LatestTimestamp | CurrentApplicationID => 2,
            CreatorAddress => 3,
            CurrentApplicationAddress | GroupID => 5,
            OpcodeBudget | CallerApplicationID | CallerApplicationAddress => 6,
        }
    }
}

impl fmt::Display for GlobalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// On-completion action of an application call.
///
/// The discriminants are the integer values the named constants stand
/// for in `int` pseudo-opcode immediates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumIter)]
#[repr(u64)]
#[allow(missing_docs)]
pub enum OnComplete {
    NoOp = 0,
    OptIn = 1,
    CloseOut = 2,
    ClearState = 3,
    UpdateApplication = 4,
    DeleteApplication = 5,
}

impl OnComplete {
    /// Integer value of the action.
    pub fn value(self) -> u64 {
        self as u64
    }

    /// Action with the given integer value, if any.
    pub fn from_value(value: u64) -> Option<Self> {
        use OnComplete::*;
        match value {
            0 => Some(NoOp),
            1 => Some(OptIn),
            2 => Some(CloseOut),
            3 => Some(ClearState),
            4 => Some(UpdateApplication),
            5 => Some(DeleteApplication),
            _ => None,
        }
    }

    /// Action named by the given `int` immediate, if any.
    pub fn from_name(name: &str) -> Option<Self> {
        use OnComplete::*;
        match name {
            "NoOp" => Some(NoOp),
            "OptIn" => Some(OptIn),
            "CloseOut" => Some(CloseOut),
            "ClearState" => Some(ClearState),
            "UpdateApplication" => Some(UpdateApplication),
            "DeleteApplication" => Some(DeleteApplication),
            _ => None,
        }
    }
}

impl fmt::Display for OnComplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Transaction type names accepted as `int` immediates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[repr(u64)]
#[allow(missing_docs)]
pub enum TxType {
    Unknown = 0,
    Pay = 1,
    KeyReg = 2,
    Acfg = 3,
    Axfer = 4,
    Afrz = 5,
    Appl = 6,
}

impl TxType {
    /// Integer value of the transaction type.
    pub fn value(self) -> u64 {
        self as u64
    }

    /// Transaction type named by the given `int` immediate, if any.
    pub fn from_name(name: &str) -> Option<Self> {
        use TxType::*;
        match name {
            "unknown" => Some(Unknown),
            "pay" => Some(Pay),
            "keyreg" => Some(KeyReg),
            "acfg" => Some(Acfg),
            "axfer" => Some(Axfer),
            "afrz" => Some(Afrz),
            "appl" => Some(Appl),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_field_has_a_valid_version() {
        for field in TransactionField::iter() {
            assert!((1..=8).contains(&field.version()), "{field}");
        }
        for field in GlobalField::iter() {
            assert!((1..=8).contains(&field.version()), "{field}");
        }
    }

    #[test]
    fn array_fields_carry_their_index() {
        assert_eq!(TransactionField::Accounts(2).array_index(), Some(2));
        assert_eq!(TransactionField::Logs(-1).array_index(), Some(-1));
        assert_eq!(TransactionField::Sender.array_index(), None);
    }

    #[test]
    fn on_complete_values_round_trip() {
        for oc in OnComplete::iter() {
            assert_eq!(OnComplete::from_value(oc.value()), Some(oc));
        }
        assert_eq!(OnComplete::from_name("UpdateApplication").unwrap().value(), 4);
        assert_eq!(OnComplete::from_value(6), None);
    }
}
