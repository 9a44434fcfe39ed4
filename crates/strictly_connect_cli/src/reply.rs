//! Single-line protocol replies.

use derive_more::Display;
use strictly_connect::GameError;

/// A status line printed after a command.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Reply {
    /// RJ succeeded.
    #[display("Jogador registado com sucesso.")]
    PlayerRegistered,
    /// RJ with a taken name.
    #[display("Jogador existente.")]
    PlayerExists,
    /// EJ succeeded.
    #[display("Jogador removido com sucesso.")]
    PlayerRemoved,
    /// EJ with an unknown name.
    #[display("Jogador não existente.")]
    PlayerMissing,
    /// EJ on a seated player.
    #[display("Jogador participa no jogo em curso.")]
    PlayerInMatch,
    /// LJ on an empty ledger.
    #[display("Não existem jogadores registados.")]
    NoPlayers,
    /// IJ succeeded. Names are printed in ascending order.
    #[display("Jogo iniciado entre {} e {}.", _0, _1)]
    MatchStarted(String, String),
    /// IJ while a match is running.
    #[display("Existe um jogo em curso.")]
    MatchActive,
    /// IJ naming an unregistered player.
    #[display("Jogador não registado.")]
    PlayerNotRegistered,
    /// IJ with rejected width or height.
    #[display("Dimensões de grelha inválidas.")]
    InvalidDimensions,
    /// IJ with a rejected winning length.
    #[display("Tamanho de sequência inválido.")]
    InvalidSequenceSize,
    /// IJ with a rejected special size.
    #[display("Dimensões de peças especiais inválidas.")]
    InvalidSpecialSequences,
    /// D succeeded.
    #[display("Desistência com sucesso. Jogo terminado.")]
    Resigned,
    /// Any match command without a match.
    #[display("Não existe jogo em curso.")]
    NoMatch,
    /// D or CP naming a player outside the match.
    #[display("Jogador não participa no jogo em curso.")]
    PlayerNotSeated,
    /// CP with a size the player no longer holds.
    #[display("Tamanho de peça não disponível.")]
    SizeUnavailable,
    /// CP off the board or into a full column.
    #[display("Posição irregular.")]
    InvalidPosition,
    /// CP accepted.
    #[display("Peça colocada.")]
    PiecePlaced,
    /// CP completed a run.
    #[display("Sequência conseguida. Jogo terminado.")]
    SequenceCompleted,
    /// G succeeded.
    #[display("Jogo gravado.")]
    Saved,
    /// G failed.
    #[display("Erro ao gravar o jogo.")]
    SaveFailed,
    /// L succeeded.
    #[display("Jogo carregado.")]
    Loaded,
    /// L failed.
    #[display("Erro ao carregar o jogo.")]
    LoadFailed,
    /// Unknown code or malformed arguments.
    #[display("Instrução inválida.")]
    InvalidInstruction,
}

impl Reply {
    /// Reply for a match started by `a` and `b`.
    pub fn started(a: &str, b: &str) -> Self {
        if a <= b {
            Reply::MatchStarted(a.to_string(), b.to_string())
        } else {
            Reply::MatchStarted(b.to_string(), a.to_string())
        }
    }
}

impl From<GameError> for Reply {
    fn from(err: GameError) -> Self {
        match err {
            GameError::PlayerExists(_) => Reply::PlayerExists,
            GameError::InvalidName(_) => Reply::InvalidInstruction,
            // Only IJ asks for an unregistered name; EJ maps its own lookup.
            GameError::UnknownPlayer(_) => Reply::PlayerNotRegistered,
            GameError::PlayerSeated(_) => Reply::PlayerInMatch,
            GameError::MatchAlreadyActive => Reply::MatchActive,
            GameError::NoMatch => Reply::NoMatch,
            GameError::PlayerNotSeated(_) => Reply::PlayerNotSeated,
            GameError::InvalidDimensions { .. } => Reply::InvalidDimensions,
            GameError::InvalidSequenceSize { .. } => Reply::InvalidSequenceSize,
            GameError::InvalidSpecialSequence { .. } => Reply::InvalidSpecialSequences,
            GameError::SizeUnavailable(_) => Reply::SizeUnavailable,
            GameError::InvalidPosition { .. } => Reply::InvalidPosition,
        }
    }
}
